//! 3D slider: arrow and dot navigation over `#slider-track`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use folio_widgets::{PageConfig, Slider, SliderLayout, Slot};

use crate::dom::{document, query_all};
use crate::gsap;

const TRACK_ID: &str = "slider-track";
const ITEM_SELECTOR: &str = ".slider-item";
const PREV_ID: &str = "slider-prev";
const NEXT_ID: &str = "slider-next";
const DOTS_ID: &str = "slider-dots";
const DOT_CLASS: &str = "slider-dot";
const ACTIVE_CLASS: &str = "active";

pub struct SliderView {
    state: RefCell<Slider>,
    track: HtmlElement,
    items: Vec<Element>,
    dots: Vec<Element>,
    listeners: RefCell<Vec<EventListener>>,
}

impl SliderView {
    /// `Ok(None)` when the page has no slider.
    pub fn install(page: &PageConfig) -> Result<Option<Rc<Self>>, JsValue> {
        let document = document()?;
        let Some(track) = document
            .get_element_by_id(TRACK_ID)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return Ok(None);
        };
        let items = query_all(&document, ITEM_SELECTOR)?;
        if items.is_empty() {
            return Ok(None);
        }

        let mut dots = Vec::with_capacity(items.len());
        if let Some(container) = document.get_element_by_id(DOTS_ID) {
            for index in 0..items.len() {
                let dot = document.create_element("div")?;
                dot.class_list().add_1(DOT_CLASS)?;
                if index == 0 {
                    dot.class_list().add_1(ACTIVE_CLASS)?;
                }
                container.append_child(&dot)?;
                dots.push(dot);
            }
        }

        let this = Rc::new(Self {
            state: RefCell::new(Slider::new(items.len(), SliderLayout::for_page(page))),
            track,
            items,
            dots,
            listeners: RefCell::new(Vec::new()),
        });
        this.bind(&document)?;

        // Initial layout runs as a transition like any other.
        if this.state.borrow_mut().go_to(0).unwrap_or(false) {
            this.render()?;
        }
        Ok(Some(this))
    }

    pub fn index(&self) -> usize {
        self.state.borrow().index()
    }

    fn bind(self: &Rc<Self>, document: &web_sys::Document) -> Result<(), JsValue> {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(prev) = document.get_element_by_id(PREV_ID) {
            let weak = Rc::downgrade(self);
            listeners.push(EventListener::new(&prev, "click", move |_| {
                navigate(&weak, |s| s.prev());
            }));
        }
        if let Some(next) = document.get_element_by_id(NEXT_ID) {
            let weak = Rc::downgrade(self);
            listeners.push(EventListener::new(&next, "click", move |_| {
                navigate(&weak, |s| s.next());
            }));
        }
        for (index, dot) in self.dots.iter().enumerate() {
            let weak = Rc::downgrade(self);
            listeners.push(EventListener::new(dot, "click", move |_| {
                navigate(&weak, |s| match s.go_to(index) {
                    Ok(moved) => moved,
                    Err(e) => {
                        log::warn!("slider: {e}");
                        false
                    }
                });
            }));
        }
        Ok(())
    }

    fn render(self: &Rc<Self>) -> Result<(), JsValue> {
        let container_width = self
            .track
            .parent_element()
            .and_then(|p| p.dyn_into::<HtmlElement>().ok())
            .map(|p| f64::from(p.offset_width()))
            .unwrap_or(0.0);

        let state = self.state.borrow();
        let weak = Rc::downgrade(self);
        let vars = gsap::vars_on_complete(&state.track_tween(container_width), move || {
            if let Some(this) = weak.upgrade() {
                this.state.borrow_mut().finish();
            }
        })?;
        gsap::to_with_vars(&self.track, &vars)?;

        for (index, item) in self.items.iter().enumerate() {
            let classes = item.class_list();
            for class in Slot::CLASSES {
                classes.remove_1(class)?;
            }
            classes.add_1(state.slot(index).class())?;
        }
        for (index, dot) in self.dots.iter().enumerate() {
            dot.class_list()
                .toggle_with_force(ACTIVE_CLASS, state.dot_active(index))?;
        }
        Ok(())
    }
}

fn navigate(weak: &Weak<SliderView>, step: impl FnOnce(&mut Slider) -> bool) {
    let Some(this) = weak.upgrade() else {
        return;
    };
    let moved = step(&mut this.state.borrow_mut());
    if moved {
        if let Err(e) = this.render() {
            log::error!("slider render failed: {e:?}");
            this.state.borrow_mut().finish();
        }
    }
}
