//! wasm-bindgen bindings for the folio page widgets.
//!
//! Each widget owns its listeners; dropping [`PageWidgets`] detaches them.
//! The preloader and scroll reveal are started separately because the page
//! sequences them after the `load` event.

use std::rc::Rc;

use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use folio_widgets::config::{MOBILE_QUERY, REDUCED_MOTION_QUERY};
use folio_widgets::PageConfig;

pub mod anchors;
pub mod cursor;
pub mod dom;
pub mod filter;
pub mod gsap;
pub mod preloader;
pub mod reveal;
pub mod slider;
pub mod video;
pub mod zoom;

pub use anchors::SmoothAnchors;
pub use cursor::CustomCursor;
pub use dom::Observer;
pub use filter::FilterBar;
pub use preloader::run_preloader;
pub use reveal::start_scroll_reveal;
pub use slider::SliderView;
pub use video::VideoHover;
pub use zoom::ZoomItems;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn media_matches(window: &web_sys::Window, query: &str) -> bool {
    match window.match_media(query) {
        Ok(Some(list)) => list.matches(),
        Ok(None) => false,
        Err(e) => {
            log::warn!("matchMedia({query}) failed: {e:?}");
            false
        }
    }
}

/// Evaluate the page flags from media queries, once.
pub fn detect_page_config() -> Result<PageConfig, JsValue> {
    let window = dom::window()?;
    Ok(PageConfig {
        is_mobile: media_matches(&window, MOBILE_QUERY),
        prefers_reduced_motion: media_matches(&window, REDUCED_MOTION_QUERY),
    })
}

/// Widgets that are live from startup.
pub struct PageWidgets {
    pub video: VideoHover,
    pub filter: FilterBar,
    pub slider: Option<Rc<SliderView>>,
    pub cursor: Option<CustomCursor>,
    pub zoom: ZoomItems,
    pub anchors: SmoothAnchors,
}

impl PageWidgets {
    pub fn install(page: &PageConfig) -> Result<Self, JsValue> {
        let cursor = if page.cursor_enabled() {
            Some(CustomCursor::install()?)
        } else {
            None
        };
        let widgets = Self {
            video: VideoHover::install()?,
            filter: FilterBar::install()?,
            slider: SliderView::install(page)?,
            cursor,
            zoom: ZoomItems::install()?,
            anchors: SmoothAnchors::install()?,
        };
        log::debug!(
            "widgets installed (mobile: {}, reduced motion: {})",
            page.is_mobile,
            page.prefers_reduced_motion
        );
        Ok(widgets)
    }
}

/// JS handle over the startup widgets, for pages that drive folio from script.
#[wasm_bindgen]
pub struct FolioWidgets {
    inner: PageWidgets,
}

#[wasm_bindgen]
impl FolioWidgets {
    /// Pass `{ is_mobile, prefers_reduced_motion }` or undefined/null to detect
    /// them from media queries.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<FolioWidgets, JsError> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let page = if jsvalue_is_undefined_or_null(&config) {
            detect_page_config().map_err(|e| JsError::new(&format!("page detection failed: {e:?}")))?
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("page config error: {e}")))?
        };
        let inner = PageWidgets::install(&page)
            .map_err(|e| JsError::new(&format!("widget install failed: {e:?}")))?;
        Ok(FolioWidgets { inner })
    }

    /// Active gallery filter: "all", "video", "design" or "3d".
    #[wasm_bindgen(js_name = current_filter)]
    pub fn current_filter(&self) -> String {
        self.inner.filter.current().to_string()
    }

    /// Index of the centered slide, undefined without a slider.
    #[wasm_bindgen(js_name = slider_index)]
    pub fn slider_index(&self) -> Option<usize> {
        self.inner.slider.as_ref().map(|s| s.index())
    }

    #[wasm_bindgen(js_name = cursor_enabled)]
    pub fn cursor_enabled(&self) -> bool {
        self.inner.cursor.is_some()
    }

    #[wasm_bindgen(js_name = zoom_open)]
    pub fn zoom_open(&self) -> bool {
        self.inner.zoom.is_open()
    }
}
