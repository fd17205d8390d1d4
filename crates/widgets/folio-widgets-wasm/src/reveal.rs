//! Scroll-triggered section entrance.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use folio_widgets::reveal::REVEAL_SELECTOR;
use folio_widgets::{PageConfig, ScrollReveal};

use crate::dom::{document, query_all, Observer};
use crate::gsap;

/// Hide reveal targets and tween each in on first intersection.
/// Returns `None` with reduced motion, where everything is shown at once.
pub fn start_scroll_reveal(page: &PageConfig) -> Result<Option<Observer>, JsValue> {
    let document = document()?;
    let targets = query_all(&document, REVEAL_SELECTOR)?;

    match ScrollReveal::for_page(page) {
        ScrollReveal::Immediate { .. } => {
            for el in targets.iter().filter_map(|el| el.dyn_ref::<HtmlElement>()) {
                el.style().set_property("opacity", "1")?;
            }
            Ok(None)
        }
        ScrollReveal::Animated {
            initial,
            enter,
            threshold,
        } => {
            for el in &targets {
                gsap::set(el, &initial)?;
            }
            log::debug!("scroll reveal: observing {} sections", targets.len());
            let observer = Observer::once(&targets, None, threshold, move |el| {
                if let Err(e) = gsap::to(el, &enter) {
                    log::error!("reveal tween failed: {e:?}");
                }
            })?;
            Ok(Some(observer))
        }
    }
}
