//! Output contracts from the loader.
//!
//! Effects are DOM/timer instructions for the host, in the order they must be
//! applied. Events are semantic signals describing state transitions; the wasm
//! adapter forwards them to JS listeners and tests assert on them.

use serde::{Deserialize, Serialize};

use crate::handle::Completion;
use crate::ids::{CardId, HandleId, TimerId};
use crate::scroll::RevealClass;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// First image registered in this card: add the card `loading` class and
    /// insert a skeleton unless the card already has one.
    PrepareCard { card: CardId },
    /// Hide the image until it completes (`loading` class, opacity 0, above the skeleton).
    PrepareImage { handle: HandleId },
    Observe { handle: HandleId },
    Unobserve { handle: HandleId },
    /// Attach load/error listeners and assign `src` if the image was deferred.
    BeginLoad { handle: HandleId, src: String },
    /// Check whether the image decoded without firing an event.
    Probe { handle: HandleId },
    /// Assign a deferred source without tracking the load.
    AssignSource { handle: HandleId, src: String },
    FadeSkeleton { card: CardId },
    RemoveSkeleton { card: CardId },
    ClearCardLoading { card: CardId },
    /// Drop the image `loading` class, add `loaded`, make it opaque.
    ShowImage { handle: HandleId },
    AddCardClass { card: CardId, class: RevealClass },
    RemoveCardClass { card: CardId, class: RevealClass },
    /// Arm a one-shot timer; call back `on_timer(timer)` after `after_ms`.
    Schedule { timer: TimerId, after_ms: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LoaderEvent {
    Queued { handle: HandleId, position: usize },
    Started { handle: HandleId },
    Completed {
        handle: HandleId,
        completion: Completion,
        forced: bool,
    },
    Idle,
    FallbackSwept { forced: usize },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub events: Vec<LoaderEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.effects.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    #[inline]
    pub fn push_event(&mut self, event: LoaderEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.events.is_empty()
    }
}
