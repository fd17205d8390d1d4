//! Hover-to-play gallery videos with deferred sources.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlVideoElement};

use folio_widgets::video::{VIDEO_ITEM_SELECTOR, VIDEO_ROOT_MARGIN, VIDEO_SELECTOR};
use folio_widgets::VideoGate;

use crate::dom::{document, query_all, Observer};

type PlayRejected = Closure<dyn FnMut(JsValue)>;

pub struct VideoHover {
    _observer: Option<Observer>,
    _listeners: Rc<RefCell<Vec<EventListener>>>,
    _on_rejected: Rc<PlayRejected>,
}

impl VideoHover {
    pub fn install() -> Result<Self, JsValue> {
        let document = document()?;
        let videos = query_all(&document, VIDEO_SELECTOR)?;
        let listeners = Rc::new(RefCell::new(Vec::new()));
        let on_rejected: Rc<PlayRejected> = Rc::new(Closure::new(|e: JsValue| {
            log::debug!("video play prevented: {e:?}");
        }));

        if videos.is_empty() {
            return Ok(Self {
                _observer: None,
                _listeners: listeners,
                _on_rejected: on_rejected,
            });
        }

        let gates: Rc<RefCell<Vec<VideoGate>>> =
            Rc::new(RefCell::new(vec![VideoGate::new(); videos.len()]));
        let tracked = videos.clone();
        let hover_listeners = listeners.clone();
        let rejected = on_rejected.clone();
        let observer = Observer::once(&videos, Some(VIDEO_ROOT_MARGIN), 0.0, move |el| {
            let Some(index) = tracked.iter().position(|v| v == el) else {
                return;
            };
            let data_src = el.get_attribute("data-src");
            let Some(source) = gates.borrow_mut()[index].arm(data_src.as_deref()) else {
                return;
            };
            let Ok(video) = el.clone().dyn_into::<HtmlVideoElement>() else {
                return;
            };
            if let Some(src) = source {
                video.set_src(&src);
                video.load();
            }
            match arm_hover(&video, rejected.clone()) {
                Ok(pair) => hover_listeners.borrow_mut().extend(pair),
                Err(e) => log::warn!("video hover not armed: {e:?}"),
            }
        })?;

        Ok(Self {
            _observer: Some(observer),
            _listeners: listeners,
            _on_rejected: on_rejected,
        })
    }
}

fn arm_hover(
    video: &HtmlVideoElement,
    on_rejected: Rc<PlayRejected>,
) -> Result<[EventListener; 2], JsValue> {
    let item: Element = video
        .closest(VIDEO_ITEM_SELECTOR)?
        .ok_or_else(|| JsValue::from_str("video outside a video item"))?;

    let v = video.clone();
    let enter = EventListener::new(&item, "mouseenter", move |_| match v.play() {
        Ok(promise) => {
            let _ = promise.catch(&on_rejected);
        }
        Err(e) => log::debug!("video play prevented: {e:?}"),
    });
    let v = video.clone();
    let leave = EventListener::new(&item, "mouseleave", move |_| {
        if let Err(e) = v.pause() {
            log::debug!("video pause failed: {e:?}");
        }
        v.set_current_time(0.0);
    });
    Ok([enter, leave])
}
