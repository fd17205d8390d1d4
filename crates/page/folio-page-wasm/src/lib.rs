//! Page entry point: installs the widgets at startup, runs the preloader once
//! the window has loaded, then starts scroll reveals and the image loader.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use js_sys::Date;
use wasm_bindgen::prelude::*;

use folio_loader::LoaderConfig;
use folio_loader_wasm::SequentialImageLoader;
use folio_widgets::PageConfig;
use folio_widgets_wasm::{
    detect_page_config, dom, run_preloader, start_scroll_reveal, Observer, PageWidgets,
};

/// Everything the page keeps alive after startup.
pub struct Page {
    config: PageConfig,
    _widgets: PageWidgets,
    reveal: RefCell<Option<Observer>>,
    loader: RefCell<Option<SequentialImageLoader>>,
    on_load: RefCell<Option<EventListener>>,
    /// Wall-clock ms of the window `load` event.
    loaded_at: Cell<Option<f64>>,
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));

    let page = Page::boot(detect_page_config()?)?;
    page.run_after_load()?;
    // Lives as long as the document.
    std::mem::forget(page);
    Ok(())
}

impl Page {
    /// Install the widgets that are live from the first frame.
    pub fn boot(config: PageConfig) -> Result<Rc<Self>, JsValue> {
        Ok(Rc::new(Self {
            config,
            _widgets: PageWidgets::install(&config)?,
            reveal: RefCell::new(None),
            loader: RefCell::new(None),
            on_load: RefCell::new(None),
            loaded_at: Cell::new(None),
        }))
    }

    pub fn config(&self) -> PageConfig {
        self.config
    }

    /// Run the preloader once the window has loaded, immediately if it already has.
    pub fn run_after_load(self: &Rc<Self>) -> Result<(), JsValue> {
        if dom::document()?.ready_state() == "complete" {
            self.record_load(Date::now());
            self.begin_preloader();
            return Ok(());
        }
        let weak = Rc::downgrade(self);
        let window = dom::window()?;
        let listener = EventListener::once(&window, "load", move |_| {
            if let Some(page) = weak.upgrade() {
                page.record_load(Date::now());
                page.begin_preloader();
            }
        });
        *self.on_load.borrow_mut() = Some(listener);
        Ok(())
    }

    /// Note when the window finished loading. The first record wins.
    pub fn record_load(&self, at_ms: f64) {
        if self.loaded_at.get().is_none() {
            self.loaded_at.set(Some(at_ms));
        }
    }

    /// Milliseconds since the recorded `load` event, 0 if none was recorded.
    pub fn ms_since_load(&self) -> u32 {
        self.loaded_at
            .get()
            .map(|at| (Date::now() - at) as u32)
            .unwrap_or(0)
    }

    fn begin_preloader(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let finish = move || {
            if let Some(page) = weak.upgrade() {
                page.finish_preloader();
            }
        };
        if let Err(e) = run_preloader(finish) {
            // Without the timeline the page is still usable; skip straight on.
            log::error!("preloader failed: {e:?}");
            self.finish_preloader();
        }
    }

    fn finish_preloader(&self) {
        if let Err(e) = self.after_preloader() {
            log::error!("page startup after preloader failed: {e:?}");
        }
    }

    /// Start scroll reveals and the sequential image loader, and arm its
    /// fallback. Does nothing if the loader is already running.
    pub fn after_preloader(&self) -> Result<(), JsValue> {
        if self.loader.borrow().is_some() {
            return Ok(());
        }
        let reveal = start_scroll_reveal(&self.config)?;
        let cfg = LoaderConfig::for_viewport(self.config.is_mobile);
        let loader = SequentialImageLoader::start(cfg)?;
        // The sweep deadline counts from `load`, not from the end of the preloader.
        loader.page_loaded_since(f64::from(self.ms_since_load()));
        log::info!(
            "page ready: {} lazy images, {} loaded",
            loader.image_count(),
            loader.loaded_count()
        );
        *self.reveal.borrow_mut() = reveal;
        *self.loader.borrow_mut() = Some(loader);
        Ok(())
    }

    /// Number of images registered with the loader, `None` before it starts.
    pub fn loader_image_count(&self) -> Option<usize> {
        self.loader.borrow().as_ref().map(|loader| loader.image_count())
    }
}
