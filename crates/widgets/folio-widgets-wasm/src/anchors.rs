//! Smooth scrolling for in-page anchors.

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, ScrollBehavior, ScrollToOptions};

use folio_widgets::anchors::{anchor_target, scroll_top_for, ANCHOR_SELECTOR};

use crate::dom::{document, query_all, window};

pub struct SmoothAnchors {
    _listeners: Vec<EventListener>,
}

impl SmoothAnchors {
    pub fn install() -> Result<Self, JsValue> {
        let window = window()?;
        let document = document()?;
        let listeners = query_all(&document, ANCHOR_SELECTOR)?
            .into_iter()
            .map(|anchor| {
                let link = anchor.clone();
                let window = window.clone();
                let document = document.clone();
                EventListener::new_with_options(
                    &anchor,
                    "click",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        event.prevent_default();
                        let href = link.get_attribute("href").unwrap_or_default();
                        let Some(selector) = anchor_target(&href) else {
                            return;
                        };
                        let target = match document.query_selector(selector) {
                            Ok(Some(el)) => el,
                            Ok(None) => return,
                            Err(e) => {
                                log::warn!("anchor {selector} is not a valid selector: {e:?}");
                                return;
                            }
                        };
                        let Some(target) = target.dyn_ref::<HtmlElement>() else {
                            return;
                        };
                        let options = ScrollToOptions::new();
                        options.set_top(scroll_top_for(f64::from(target.offset_top())));
                        options.set_behavior(ScrollBehavior::Smooth);
                        window.scroll_to_with_scroll_to_options(&options);
                    },
                )
            })
            .collect();
        Ok(Self {
            _listeners: listeners,
        })
    }
}
