//! DomLoader: applies loader effects to the document and feeds browser signals back.
//!
//! All state sits behind `RefCell`s that are only borrowed for the duration of
//! a single core call or DOM write. Browser callbacks hold `Weak` references so
//! a dropped loader simply stops reacting.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use hashbrown::HashMap;
use js_sys::{Array, Function};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, Node,
};

use folio_loader::{
    CardId, Effect, HandleId, ImageAttrs, LoadReport, LoaderConfig, LoaderError, LoaderEvent,
    SequentialLoader, TimerId,
};

/// Elements that own a skeleton.
pub const CARD_SELECTOR: &str = ".gallery-item, .zoom-match-item, .video-item";
/// Images managed by the loader.
pub const LAZY_IMAGE_SELECTOR: &str = "img[loading=\"lazy\"]";

const HANDLE_ATTR: &str = "data-folio-handle";
const SKELETON_CLASS: &str = "skeleton";
const SKELETON_CSS: &str = "position: absolute; inset: 0; transition: opacity 0.3s ease; \
                            border-radius: inherit; z-index: 1;";

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

pub struct DomLoader {
    core: RefCell<SequentialLoader>,
    document: Document,
    images: RefCell<Vec<HtmlImageElement>>,
    cards: RefCell<Vec<Element>>,
    observer: RefCell<Option<(IntersectionObserver, ObserverCallback)>>,
    scroll: RefCell<Option<EventListener>>,
    load_listeners: RefCell<HashMap<HandleId, [EventListener; 2]>>,
    // Listeners of finished loads; dropped on the next load so a callback
    // never frees itself.
    retired: RefCell<Vec<EventListener>>,
    reports: RefCell<Vec<(HandleId, LoadReport)>>,
    on_event: RefCell<Option<Function>>,
}

impl DomLoader {
    /// Register every lazy image of the document and start observing them.
    pub fn start(cfg: LoaderConfig) -> Result<Rc<Self>, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let scroll_y = window.page_y_offset().unwrap_or(0.0);

        let this = Rc::new(Self {
            core: RefCell::new(SequentialLoader::with_scroll_offset(cfg, scroll_y)),
            document,
            images: RefCell::new(Vec::new()),
            cards: RefCell::new(Vec::new()),
            observer: RefCell::new(None),
            scroll: RefCell::new(None),
            load_listeners: RefCell::new(HashMap::new()),
            retired: RefCell::new(Vec::new()),
            reports: RefCell::new(Vec::new()),
            on_event: RefCell::new(None),
        });

        this.install_scroll_tracking(&window);
        this.install_observer()?;
        this.register_images()?;
        this.flush();
        Ok(this)
    }

    /// Arm the page-wide fallback sweep for a `load` event `elapsed_ms` ago.
    pub fn page_loaded(self: &Rc<Self>, elapsed_ms: u32) -> bool {
        let armed = self.core.borrow_mut().on_page_load_after(elapsed_ms);
        self.flush();
        armed
    }

    pub fn set_event_listener(&self, f: Option<Function>) {
        *self.on_event.borrow_mut() = f;
    }

    /// Read-only access to the core state.
    pub fn with_core<R>(&self, f: impl FnOnce(&SequentialLoader) -> R) -> R {
        f(&self.core.borrow())
    }

    fn install_scroll_tracking(self: &Rc<Self>, window: &web_sys::Window) {
        let weak = Rc::downgrade(self);
        let target = window.clone();
        let listener = EventListener::new(window, "scroll", move |_| {
            if let Some(this) = weak.upgrade() {
                let y = target.page_y_offset().unwrap_or(0.0);
                this.core.borrow_mut().on_scroll(y);
            }
        });
        *self.scroll.borrow_mut() = Some(listener);
    }

    fn install_observer(self: &Rc<Self>) -> Result<(), JsValue> {
        let weak: Weak<Self> = Rc::downgrade(self);
        let callback: ObserverCallback =
            Closure::new(move |entries: Array, _observer: IntersectionObserver| {
                let Some(this) = weak.upgrade() else {
                    return;
                };
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    if let Some(handle) = handle_of(&entry.target()) {
                        this.visible(handle);
                    }
                }
                this.flush();
            });

        let (margin, threshold) = {
            let core = self.core.borrow();
            let cfg = core.config();
            (cfg.root_margin(), cfg.intersection_threshold)
        };
        let options = IntersectionObserverInit::new();
        options.set_root_margin(&margin);
        options.set_threshold(&JsValue::from_f64(threshold));
        let observer = IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        *self.observer.borrow_mut() = Some((observer, callback));
        Ok(())
    }

    fn register_images(&self) -> Result<(), JsValue> {
        let nodes = self.document.query_selector_all(LAZY_IMAGE_SELECTOR)?;
        for i in 0..nodes.length() {
            let Some(img) = nodes
                .get(i)
                .and_then(|n| n.dyn_into::<HtmlImageElement>().ok())
            else {
                continue;
            };
            let attrs = ImageAttrs {
                src: img.get_attribute("src"),
                data_src: img.get_attribute("data-src"),
                class_list: img.class_name(),
            };
            if self.core.borrow().config().is_excluded(&attrs.class_list) {
                continue;
            }
            let Some(card_el) = img.closest(CARD_SELECTOR)? else {
                continue;
            };
            let card = self.card_id(card_el);
            let registered = self.core.borrow_mut().register_image(card, &attrs);
            match registered {
                Ok(Some(handle)) => {
                    img.set_attribute(HANDLE_ATTR, &handle.0.to_string())?;
                    self.images.borrow_mut().push(img);
                }
                Ok(None) => {}
                Err(err) => log::warn!("skipping image: {err}"),
            }
        }
        log::debug!("registered {} lazy image(s)", self.images.borrow().len());
        Ok(())
    }

    fn card_id(&self, element: Element) -> CardId {
        let mut cards = self.cards.borrow_mut();
        if let Some(pos) = cards.iter().position(|c| *c == element) {
            return CardId(pos as u32);
        }
        let id = self.core.borrow_mut().register_card();
        cards.push(element);
        id
    }

    fn visible(&self, handle: HandleId) {
        let result = self.core.borrow_mut().on_visible(handle);
        log_misuse(result.map(|_| ()));
    }

    fn report(self: &Rc<Self>, handle: HandleId, report: LoadReport) {
        self.reports.borrow_mut().push((handle, report));
        self.flush();
    }

    fn fire(self: &Rc<Self>, timer: TimerId) {
        let result = self.core.borrow_mut().on_timer(timer);
        log_misuse(result);
        self.flush();
    }

    /// Apply outputs until the core and the deferred report list are both quiet.
    fn flush(self: &Rc<Self>) {
        loop {
            let outputs = self.core.borrow_mut().take_outputs();
            let reports = std::mem::take(&mut *self.reports.borrow_mut());
            if outputs.is_empty() && reports.is_empty() {
                break;
            }
            for effect in outputs.effects {
                if let Err(err) = self.apply(effect) {
                    log::warn!("loader effect failed: {:?}", err);
                }
            }
            for event in outputs.events {
                self.emit(&event);
            }
            for (handle, report) in reports {
                let result = self.core.borrow_mut().report(handle, report);
                log_misuse(result.map(|_| ()));
            }
        }
    }

    fn apply(self: &Rc<Self>, effect: Effect) -> Result<(), JsValue> {
        match effect {
            Effect::PrepareCard { card } => {
                let card = self.card(card)?;
                card.class_list().add_1("loading")?;
                if card.query_selector(&format!(".{SKELETON_CLASS}"))?.is_none() {
                    let skeleton = self.document.create_element("div")?;
                    skeleton.set_class_name(SKELETON_CLASS);
                    skeleton.set_attribute("style", SKELETON_CSS)?;
                    if let Some(html) = card.dyn_ref::<HtmlElement>() {
                        html.style().set_property("position", "relative")?;
                    }
                    // Directly before the card's first lazy image, else first child.
                    let image = card.query_selector(LAZY_IMAGE_SELECTOR)?;
                    match image.as_ref().and_then(|img| Some((img.parent_node()?, img))) {
                        Some((parent, img)) => {
                            let before: &Node = img;
                            parent.insert_before(&skeleton, Some(before))?
                        }
                        None => card.insert_before(&skeleton, card.first_child().as_ref())?,
                    };
                }
            }
            Effect::PrepareImage { handle } => {
                let img = self.image(handle)?;
                img.class_list().add_1("loading")?;
                let style = img.style();
                style.set_property("opacity", "0")?;
                style.set_property("position", "relative")?;
                style.set_property("z-index", "2")?;
            }
            Effect::Observe { handle } => {
                let img = self.image(handle)?;
                if let Some((observer, _)) = self.observer.borrow().as_ref() {
                    observer.observe(&img);
                }
            }
            Effect::Unobserve { handle } => {
                let img = self.image(handle)?;
                if let Some((observer, _)) = self.observer.borrow().as_ref() {
                    observer.unobserve(&img);
                }
            }
            Effect::BeginLoad { handle, src } => {
                self.retired.borrow_mut().clear();
                let img = self.image(handle)?;
                self.listen_for_load(handle, &img);
                if img.get_attribute("src").unwrap_or_default().trim().is_empty() {
                    img.set_src(&src);
                } else if img.complete() {
                    let report = if img.natural_height() != 0 {
                        LoadReport::Decoded
                    } else {
                        LoadReport::Errored
                    };
                    self.reports.borrow_mut().push((handle, report));
                }
            }
            Effect::Probe { handle } => {
                let img = self.image(handle)?;
                if img.complete() && img.natural_height() != 0 {
                    self.reports
                        .borrow_mut()
                        .push((handle, LoadReport::Decoded));
                }
            }
            Effect::AssignSource { handle, src } => {
                let img = self.image(handle)?;
                if img.get_attribute("src").unwrap_or_default().trim().is_empty() {
                    img.set_src(&src);
                }
            }
            Effect::FadeSkeleton { card } => {
                if let Some(skeleton) = self.skeleton(card)? {
                    if let Some(html) = skeleton.dyn_ref::<HtmlElement>() {
                        html.style().set_property("opacity", "0")?;
                    }
                }
            }
            Effect::RemoveSkeleton { card } => {
                if let Some(skeleton) = self.skeleton(card)? {
                    skeleton.remove();
                }
            }
            Effect::ClearCardLoading { card } => {
                self.card(card)?.class_list().remove_1("loading")?;
            }
            Effect::ShowImage { handle } => {
                let img = self.image(handle)?;
                img.class_list().remove_1("loading")?;
                img.class_list().add_1("loaded")?;
                img.style().set_property("opacity", "1")?;
            }
            Effect::AddCardClass { card, class } => {
                self.card(card)?.class_list().add_1(class.as_str())?;
            }
            Effect::RemoveCardClass { card, class } => {
                self.card(card)?.class_list().remove_1(class.as_str())?;
            }
            Effect::Schedule { timer, after_ms } => {
                let weak = Rc::downgrade(self);
                Timeout::new(after_ms, move || {
                    if let Some(this) = weak.upgrade() {
                        this.fire(timer);
                    }
                })
                .forget();
            }
        }
        Ok(())
    }

    fn listen_for_load(self: &Rc<Self>, handle: HandleId, img: &HtmlImageElement) {
        let on_load = {
            let weak = Rc::downgrade(self);
            EventListener::once(img, "load", move |_| {
                if let Some(this) = weak.upgrade() {
                    this.report(handle, LoadReport::Decoded);
                }
            })
        };
        let on_error = {
            let weak = Rc::downgrade(self);
            EventListener::once(img, "error", move |_| {
                if let Some(this) = weak.upgrade() {
                    this.report(handle, LoadReport::Errored);
                }
            })
        };
        self.load_listeners
            .borrow_mut()
            .insert(handle, [on_load, on_error]);
    }

    fn emit(&self, event: &LoaderEvent) {
        if let LoaderEvent::Completed { handle, .. } = event {
            if let Some(listeners) = self.load_listeners.borrow_mut().remove(handle) {
                self.retired.borrow_mut().extend(listeners);
            }
        }
        let callback = self.on_event.borrow().clone();
        if let Some(f) = callback {
            match serde_wasm_bindgen::to_value(event) {
                Ok(value) => {
                    if let Err(err) = f.call1(&JsValue::UNDEFINED, &value) {
                        log::warn!("loader event listener threw: {:?}", err);
                    }
                }
                Err(err) => log::warn!("could not serialize loader event: {err}"),
            }
        }
    }

    fn image(&self, handle: HandleId) -> Result<HtmlImageElement, JsValue> {
        self.images
            .borrow()
            .get(handle.0 as usize)
            .cloned()
            .ok_or_else(|| JsValue::from_str(&LoaderError::UnknownHandle(handle).to_string()))
    }

    fn card(&self, card: CardId) -> Result<Element, JsValue> {
        self.cards
            .borrow()
            .get(card.0 as usize)
            .cloned()
            .ok_or_else(|| JsValue::from_str(&LoaderError::UnknownCard(card).to_string()))
    }

    fn skeleton(&self, card: CardId) -> Result<Option<Element>, JsValue> {
        self.card(card)?
            .query_selector(&format!(".{SKELETON_CLASS}"))
    }
}

impl Drop for DomLoader {
    fn drop(&mut self) {
        if let Some((observer, _callback)) = self.observer.get_mut().take() {
            observer.disconnect();
        }
    }
}

fn handle_of(element: &Element) -> Option<HandleId> {
    element
        .get_attribute(HANDLE_ATTR)
        .and_then(|raw| raw.parse().ok())
        .map(HandleId)
}

fn log_misuse(result: Result<(), LoaderError>) {
    if let Err(err) = result {
        log::warn!("loader: {err}");
    }
}
