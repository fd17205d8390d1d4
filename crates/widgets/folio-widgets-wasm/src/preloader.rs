//! Preloader: counts to 100%, brightens the title letters, then hands the
//! page over to the hero.

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use folio_widgets::{letter_opacity, percent_label, preloader_plan, PreloaderTarget};

use crate::dom::{document, query_all, window};
use crate::gsap;

pub const PERCENTAGE_SELECTOR: &str = "#loading-percentage";
pub const LETTER_SELECTOR: &str = ".letter";
const PRELOADER_ID: &str = "preloader";

/// Build and start the preloader timeline. `on_complete` runs once the last
/// tween ends and the preloader is hidden.
pub fn run_preloader(on_complete: impl FnOnce() + 'static) -> Result<(), JsValue> {
    let window = window()?;
    let document = document()?;
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);

    let counter = Object::new();
    Reflect::set(&counter, &"value".into(), &JsValue::from_f64(0.0))?;

    let doc = document.clone();
    let finish = move || {
        hide_preloader(&doc);
        on_complete();
    };
    let tl_vars = Object::new();
    Reflect::set(&tl_vars, &"onComplete".into(), &Closure::once_into_js(finish))?;
    let timeline = gsap::timeline(&tl_vars)?;

    let plan = preloader_plan(width, height);
    log::debug!("preloader: {} steps for {width}x{height}", plan.len());
    for step in &plan {
        let targets = match step.target {
            PreloaderTarget::Counter => counter.clone().into(),
            PreloaderTarget::Pause => Object::new().into(),
            other => JsValue::from_str(other.selector().unwrap_or_default()),
        };
        let vars = gsap::vars(&step.vars)?;
        if step.target == PreloaderTarget::Counter {
            let on_update = counter_updater(&document, counter.clone())?;
            Reflect::set(&vars, &"onUpdate".into(), &on_update)?;
        }
        timeline.add(step.method, &targets, &vars, step.position)?;
    }
    Ok(())
}

fn counter_updater(document: &Document, counter: Object) -> Result<JsValue, JsValue> {
    let label = document
        .query_selector(PERCENTAGE_SELECTOR)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let letters: Vec<HtmlElement> = query_all(document, LETTER_SELECTOR)?
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect();

    // Runs on every tick of the counter tween for the page's lifetime.
    let update = Closure::<dyn FnMut()>::new(move || {
        let value = Reflect::get(&counter, &"value".into())
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        if let Some(label) = &label {
            label.set_text_content(Some(&percent_label(value)));
        }
        let progress = value / 100.0;
        for (i, letter) in letters.iter().enumerate() {
            if let Some(opacity) = letter_opacity(i, letters.len(), progress) {
                let _ = letter.style().set_property("opacity", &opacity.to_string());
            }
        }
    });
    Ok(update.into_js_value())
}

fn hide_preloader(document: &Document) {
    let Some(el) = document
        .get_element_by_id(PRELOADER_ID)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        log::warn!("preloader element missing");
        return;
    };
    if let Err(e) = el.style().set_property("display", "none") {
        log::error!("hiding preloader failed: {e:?}");
    }
}
