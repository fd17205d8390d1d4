//! Gallery filter buttons.

use std::cell::Cell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use folio_widgets::filter::{FILTER_ATTR, FILTER_BUTTON_SELECTOR};
use folio_widgets::Filter;

use crate::dom::{document, query_all};
use crate::gsap;

const ACTIVE_CLASS: &str = "active";

pub struct FilterBar {
    current: Rc<Cell<Filter>>,
    _listeners: Vec<EventListener>,
}

impl FilterBar {
    pub fn install() -> Result<Self, JsValue> {
        let document = document()?;
        let buttons = Rc::new(query_all(&document, FILTER_BUTTON_SELECTOR)?);
        let current = Rc::new(Cell::new(Filter::All));

        let listeners = buttons
            .iter()
            .map(|button| {
                let clicked = button.clone();
                let all = buttons.clone();
                let doc = document.clone();
                let current = current.clone();
                EventListener::new(button, "click", move |_| {
                    let raw = clicked.get_attribute(FILTER_ATTR).unwrap_or_default();
                    let filter = match raw.parse::<Filter>() {
                        Ok(filter) => filter,
                        Err(e) => {
                            log::warn!("filter button ignored: {e}");
                            return;
                        }
                    };
                    if let Err(e) = apply(&doc, &all, &clicked, filter) {
                        log::error!("filter {filter} failed: {e:?}");
                        return;
                    }
                    current.set(filter);
                })
            })
            .collect();

        Ok(Self {
            current,
            _listeners: listeners,
        })
    }

    pub fn current(&self) -> Filter {
        self.current.get()
    }
}

fn apply(
    document: &Document,
    buttons: &[Element],
    clicked: &Element,
    filter: Filter,
) -> Result<(), JsValue> {
    for button in buttons {
        button
            .class_list()
            .toggle_with_force(ACTIVE_CLASS, button == clicked)?;
    }
    for (section, vars) in filter.transitions() {
        match document.get_element_by_id(section.element_id()) {
            Some(el) => gsap::to(&el, &vars)?,
            None => log::debug!("filter: #{} not on page", section.element_id()),
        }
    }
    Ok(())
}
