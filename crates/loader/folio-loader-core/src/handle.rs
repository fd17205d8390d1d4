//! Per-image records.

use serde::{Deserialize, Serialize};

use crate::error::FailureKind;
use crate::ids::{CardId, HandleId};

/// Attributes read from an image element at registration time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttrs {
    /// `src` attribute.
    #[serde(default)]
    pub src: Option<String>,
    /// `data-src` attribute, used when `src` is empty.
    #[serde(default)]
    pub data_src: Option<String>,
    /// `class` attribute.
    #[serde(default)]
    pub class_list: String,
}

/// Effective source URL: `src` unless empty, else `data-src`.
pub fn resolve_source(src: Option<&str>, data_src: Option<&str>) -> Option<String> {
    [src, data_src]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// How a handle finished.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    Loaded,
    Failed(FailureKind),
}

impl Completion {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Completion::Loaded)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleState {
    /// Registered, not yet seen in the viewport.
    Pending,
    /// Seen, waiting for its turn.
    Queued,
    /// The single in-flight image.
    Loading,
    /// Terminal.
    Done(Completion),
}

impl HandleState {
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, HandleState::Done(_))
    }
}

#[derive(Clone, Debug)]
pub struct ImageHandle {
    pub id: HandleId,
    pub card: CardId,
    pub src: Option<String>,
    /// True when `src` came from `data-src` and must be assigned before loading.
    pub deferred: bool,
    pub state: HandleState,
}

impl ImageHandle {
    pub(crate) fn new(id: HandleId, card: CardId, attrs: &ImageAttrs) -> Self {
        let primary = resolve_source(attrs.src.as_deref(), None);
        let src = resolve_source(attrs.src.as_deref(), attrs.data_src.as_deref());
        Self {
            id,
            card,
            deferred: primary.is_none() && src.is_some(),
            src,
            state: HandleState::Pending,
        }
    }
}
