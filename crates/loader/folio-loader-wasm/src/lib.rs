//! wasm-bindgen interface for the folio sequential image loader.
//!
//! ```js
//! const loader = new SequentialImageLoader({ is_mobile: matchMedia("(max-width: 768px)").matches });
//! loader.set_event_listener((event) => console.debug(event));
//! loader.page_loaded_since(performance.now() - loadEventTime);
//! ```

use std::rc::Rc;

use js_sys::Function;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use folio_loader::{LoaderConfig, Phase, ScrollDirection};

pub mod dom;

pub use dom::DomLoader;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Parse an optional, possibly partial, JS config object.
pub fn parse_config(config: JsValue) -> Result<LoaderConfig, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        Ok(LoaderConfig::default())
    } else {
        swb::from_value(config).map_err(|e| JsError::new(&format!("loader config error: {e}")))
    }
}

#[wasm_bindgen]
pub struct SequentialImageLoader {
    inner: Rc<DomLoader>,
}

#[wasm_bindgen]
impl SequentialImageLoader {
    /// Register and observe every `img[loading="lazy"]` inside a card.
    /// Pass a config object or undefined/null for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<SequentialImageLoader, JsError> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let cfg = parse_config(config)?;
        Self::start(cfg).map_err(|e| JsError::new(&format!("loader start failed: {e:?}")))
    }

    /// Arm the fallback sweep. Returns false if it was already armed.
    #[wasm_bindgen(js_name = page_loaded)]
    pub fn page_loaded(&self) -> bool {
        self.inner.page_loaded(0)
    }

    /// Arm the fallback sweep for a `load` event that fired `elapsed_ms` ago,
    /// keeping its deadline relative to that event.
    #[wasm_bindgen(js_name = page_loaded_since)]
    pub fn page_loaded_since(&self, elapsed_ms: f64) -> bool {
        // Negative and NaN clamp to 0, huge values to u32::MAX.
        self.inner.page_loaded(elapsed_ms as u32)
    }

    /// Receive every loader event (`Queued`, `Started`, `Completed`, ...) as a plain object.
    #[wasm_bindgen(js_name = set_event_listener)]
    pub fn set_event_listener(&self, listener: Option<Function>) {
        self.inner.set_event_listener(listener);
    }

    #[wasm_bindgen(js_name = queue_length)]
    pub fn queue_length(&self) -> usize {
        self.inner.with_core(|core| core.queue_len())
    }

    #[wasm_bindgen(js_name = loaded_count)]
    pub fn loaded_count(&self) -> usize {
        self.inner.with_core(|core| core.loaded_count())
    }

    #[wasm_bindgen(js_name = image_count)]
    pub fn image_count(&self) -> usize {
        self.inner.with_core(|core| core.handles().count())
    }

    /// Handle id of the image currently loading, if any.
    #[wasm_bindgen(js_name = in_flight)]
    pub fn in_flight(&self) -> Option<u32> {
        self.inner.with_core(|core| core.in_flight().map(|h| h.0))
    }

    #[wasm_bindgen(js_name = is_idle)]
    pub fn is_idle(&self) -> bool {
        self.inner.with_core(|core| core.phase() == Phase::Idle)
    }

    /// "up" or "down".
    #[wasm_bindgen(js_name = scroll_direction)]
    pub fn scroll_direction(&self) -> String {
        match self.inner.with_core(|core| core.scroll_direction()) {
            ScrollDirection::Up => "up".to_string(),
            ScrollDirection::Down => "down".to_string(),
        }
    }
}

impl SequentialImageLoader {
    /// Rust-side constructor used by the page startup routine.
    pub fn start(cfg: LoaderConfig) -> Result<SequentialImageLoader, JsValue> {
        Ok(SequentialImageLoader {
            inner: DomLoader::start(cfg)?,
        })
    }
}
