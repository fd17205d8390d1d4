//! Folio sequential image loader (DOM-agnostic core).
//!
//! The loader reveals lazy images one at a time, in the order they were
//! discovered in the viewport. It never touches the DOM or a clock: hosts feed
//! it discovery, scroll, load and timer signals and apply the [`Effect`]s it
//! emits. See `folio-loader-wasm` for the browser adapter.

pub mod config;
pub mod error;
pub mod handle;
pub mod ids;
pub mod loader;
pub mod outputs;
pub mod scroll;

pub use config::LoaderConfig;
pub use error::{FailureKind, LoaderError};
pub use handle::{resolve_source, Completion, HandleState, ImageAttrs, ImageHandle};
pub use ids::{CardId, HandleId, TimerId};
pub use loader::{LoadReport, Phase, SequentialLoader, TimerKind};
pub use outputs::{Effect, LoaderEvent, Outputs};
pub use scroll::{RevealClass, ScrollDirection, ScrollTracker};
