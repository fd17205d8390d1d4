//! Bindings to the page's GSAP global.
//!
//! Every import uses `catch` so a missing or failing library surfaces as a
//! `JsValue` error instead of trapping.

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

use folio_widgets::{Position, TweenMethod, TweenSpec};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = gsap, js_name = to)]
    fn gsap_to(targets: &JsValue, vars: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = gsap, js_name = set)]
    fn gsap_set(targets: &JsValue, vars: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = gsap, js_name = timeline)]
    fn gsap_timeline(vars: &JsValue) -> Result<Timeline, JsValue>;

    pub type Timeline;

    #[wasm_bindgen(catch, method, js_name = to)]
    fn tl_to(
        this: &Timeline,
        targets: &JsValue,
        vars: &JsValue,
        position: &JsValue,
    ) -> Result<Timeline, JsValue>;

    #[wasm_bindgen(catch, method, js_name = from)]
    fn tl_from(
        this: &Timeline,
        targets: &JsValue,
        vars: &JsValue,
        position: &JsValue,
    ) -> Result<Timeline, JsValue>;
}

/// Plain vars object for a tween.
pub fn vars(tween: &TweenSpec) -> Result<Object, JsValue> {
    let value = serde_wasm_bindgen::to_value(tween)?;
    Ok(value.unchecked_into())
}

/// Vars with an `onComplete` callback that runs once.
pub fn vars_on_complete(
    tween: &TweenSpec,
    on_complete: impl FnOnce() + 'static,
) -> Result<Object, JsValue> {
    let obj = vars(tween)?;
    Reflect::set(
        &obj,
        &JsValue::from_str("onComplete"),
        &Closure::once_into_js(on_complete),
    )?;
    Ok(obj)
}

pub fn to(targets: &JsValue, tween: &TweenSpec) -> Result<(), JsValue> {
    let vars = vars(tween)?;
    gsap_to(targets, &vars)?;
    Ok(())
}

pub fn to_with_vars(targets: &JsValue, vars: &Object) -> Result<(), JsValue> {
    gsap_to(targets, vars)?;
    Ok(())
}

pub fn set(targets: &JsValue, tween: &TweenSpec) -> Result<(), JsValue> {
    let vars = vars(tween)?;
    gsap_set(targets, &vars)?;
    Ok(())
}

pub fn timeline(vars: &Object) -> Result<Timeline, JsValue> {
    gsap_timeline(vars)
}

impl Timeline {
    /// Append a tween at `position`.
    pub fn add(
        &self,
        method: TweenMethod,
        targets: &JsValue,
        vars: &Object,
        position: Position,
    ) -> Result<(), JsValue> {
        let position = position
            .to_param()
            .map(|p| JsValue::from_str(&p))
            .unwrap_or(JsValue::UNDEFINED);
        match method {
            TweenMethod::To => self.tl_to(targets, vars, &position)?,
            TweenMethod::From => self.tl_from(targets, vars, &position)?,
        };
        Ok(())
    }
}
