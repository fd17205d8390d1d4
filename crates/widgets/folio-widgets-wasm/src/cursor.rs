//! Custom cursor driven by `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MouseEvent};

use folio_widgets::cursor::{CURSOR_CLASS, CURSOR_HOVER_CLASS, CURSOR_HOVER_SELECTOR};
use folio_widgets::CursorFollower;

use crate::dom::{document, query_all, window};

struct FrameLoop {
    follower: RefCell<CursorFollower>,
    element: HtmlElement,
    frame: RefCell<Option<AnimationFrame>>,
}

impl FrameLoop {
    fn schedule(self: &Rc<Self>) {
        let this = self.clone();
        let frame = request_animation_frame(move |_| {
            let transform = {
                let mut follower = this.follower.borrow_mut();
                follower.step();
                follower.transform()
            };
            let _ = this.element.style().set_property("transform", &transform);
            this.schedule();
        });
        *self.frame.borrow_mut() = Some(frame);
    }
}

pub struct CustomCursor {
    frames: Rc<FrameLoop>,
    _listeners: Vec<EventListener>,
}

impl CustomCursor {
    pub fn install() -> Result<Self, JsValue> {
        let window = window()?;
        let document = document()?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?;
        let element: HtmlElement = document.create_element("div")?.dyn_into()?;
        element.class_list().add_1(CURSOR_CLASS)?;
        body.append_child(&element)?;

        let frames = Rc::new(FrameLoop {
            follower: RefCell::new(CursorFollower::default()),
            element: element.clone(),
            frame: RefCell::new(None),
        });
        frames.schedule();

        let passive = EventListenerOptions::default();
        let mut listeners = Vec::new();
        let tracker = frames.clone();
        listeners.push(EventListener::new_with_options(
            &window,
            "mousemove",
            passive,
            move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    tracker
                        .follower
                        .borrow_mut()
                        .set_target(f64::from(event.client_x()), f64::from(event.client_y()));
                }
            },
        ));
        for target in query_all(&document, CURSOR_HOVER_SELECTOR)? {
            let cursor = element.clone();
            listeners.push(EventListener::new_with_options(
                &target,
                "mouseenter",
                passive,
                move |_| {
                    let _ = cursor.class_list().add_1(CURSOR_HOVER_CLASS);
                },
            ));
            let cursor = element.clone();
            listeners.push(EventListener::new_with_options(
                &target,
                "mouseleave",
                passive,
                move |_| {
                    let _ = cursor.class_list().remove_1(CURSOR_HOVER_CLASS);
                },
            ));
        }

        Ok(Self {
            frames,
            _listeners: listeners,
        })
    }
}

impl Drop for CustomCursor {
    fn drop(&mut self) {
        // Cancels the pending frame and breaks the loop's self-reference.
        self.frames.frame.borrow_mut().take();
        self.frames.element.remove();
    }
}
