//! Folio page widgets (DOM-agnostic core).
//!
//! Everything here is plain state and arithmetic: tween plans handed to the
//! animation-timeline library, slider navigation, the cursor follower, filter
//! visibility. `folio-widgets-wasm` binds them to the document.

pub mod anchors;
pub mod config;
pub mod cursor;
pub mod error;
pub mod filter;
pub mod preloader;
pub mod reveal;
pub mod slider;
pub mod tween;
pub mod video;
pub mod zoom;

pub use config::PageConfig;
pub use cursor::CursorFollower;
pub use error::WidgetError;
pub use filter::{Filter, Section};
pub use preloader::{
    letter_opacity, percent_label, plan_duration, preloader_plan, PreloaderTarget, Step,
};
pub use reveal::ScrollReveal;
pub use slider::{Slider, SliderLayout, Slot};
pub use tween::{resolve_starts, Ease, Position, TweenMethod, TweenSpec};
pub use video::VideoGate;
pub use zoom::ZoomOverlay;
