//! Click-to-zoom overlay.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlImageElement};

use folio_widgets::zoom::{
    OVERLAY_CLOSED_BACKGROUND, OVERLAY_CSS, OVERLAY_OPEN_BACKGROUND, ZOOMED_IMAGE_CSS,
    ZOOM_CLOSE_MS, ZOOM_ITEM_SELECTOR,
};
use folio_widgets::ZoomOverlay;

use crate::dom::{document, query_all};

/// The overlay currently attached to the body.
struct Shown {
    overlay: HtmlElement,
    image: HtmlElement,
    _open_frame: AnimationFrame,
    _close: EventListener,
}

struct ZoomState {
    document: Document,
    overlay: Cell<ZoomOverlay>,
    shown: RefCell<Option<Shown>>,
}

pub struct ZoomItems {
    state: Rc<ZoomState>,
    _listeners: Vec<EventListener>,
}

impl ZoomItems {
    pub fn install() -> Result<Self, JsValue> {
        let document = document()?;
        let state = Rc::new(ZoomState {
            document: document.clone(),
            overlay: Cell::new(ZoomOverlay::Closed),
            shown: RefCell::new(None),
        });

        let listeners = query_all(&document, ZOOM_ITEM_SELECTOR)?
            .into_iter()
            .map(|item| {
                let state = state.clone();
                let source = item.clone();
                EventListener::new(&item, "click", move |_| {
                    let Ok(Some(img)) = source.query_selector("img") else {
                        return;
                    };
                    let Ok(img) = img.dyn_into::<HtmlImageElement>() else {
                        return;
                    };
                    if let Err(e) = open(&state, &img.src()) {
                        log::error!("zoom overlay failed: {e:?}");
                        state.overlay.set(ZoomOverlay::Closed);
                    }
                })
            })
            .collect();

        Ok(Self {
            state,
            _listeners: listeners,
        })
    }

    pub fn is_open(&self) -> bool {
        self.state.overlay.get() != ZoomOverlay::Closed
    }
}

fn open(state: &Rc<ZoomState>, src: &str) -> Result<(), JsValue> {
    let mut overlay_state = state.overlay.get();
    if !overlay_state.open() {
        return Ok(());
    }
    state.overlay.set(overlay_state);

    let document = &state.document;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;
    let overlay: HtmlElement = document.create_element("div")?.dyn_into()?;
    overlay.style().set_css_text(OVERLAY_CSS);
    let image: HtmlImageElement = document.create_element("img")?.dyn_into()?;
    image.set_src(src);
    image.style().set_css_text(ZOOMED_IMAGE_CSS);
    overlay.append_child(&image)?;
    body.append_child(&overlay)?;

    let (o, i) = (overlay.clone(), image.clone());
    let open_frame = request_animation_frame(move |_| {
        let _ = o.style().set_property("background", OVERLAY_OPEN_BACKGROUND);
        let _ = i.style().set_property("transform", "scale(1)");
        let _ = i.style().set_property("opacity", "1");
    });

    let weak = Rc::downgrade(state);
    let close = EventListener::new(&overlay, "click", move |_| {
        if let Some(state) = weak.upgrade() {
            close(&state);
        }
    });

    *state.shown.borrow_mut() = Some(Shown {
        overlay,
        image: image.into(),
        _open_frame: open_frame,
        _close: close,
    });
    Ok(())
}

fn close(state: &Rc<ZoomState>) {
    let mut overlay_state = state.overlay.get();
    if !overlay_state.close() {
        return;
    }
    state.overlay.set(overlay_state);

    if let Some(shown) = state.shown.borrow().as_ref() {
        let _ = shown.image.style().set_property("transform", "scale(0.5)");
        let _ = shown.image.style().set_property("opacity", "0");
        let _ = shown
            .overlay
            .style()
            .set_property("background", OVERLAY_CLOSED_BACKGROUND);
    }

    let weak = Rc::downgrade(state);
    Timeout::new(ZOOM_CLOSE_MS, move || {
        let Some(state) = weak.upgrade() else {
            return;
        };
        if let Some(shown) = state.shown.borrow_mut().take() {
            shown.overlay.remove();
        }
        let mut overlay_state = state.overlay.get();
        overlay_state.removed();
        state.overlay.set(overlay_state);
    })
    .forget();
}
