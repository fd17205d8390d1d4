//! Loader ids. Handle and card ids are dense indices into the loader's own
//! tables; timer ids only need to be unique per loader.

use serde::{Deserialize, Serialize};

/// One lazy-loadable image.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleId(pub u32);

/// The card element wrapping one or more images (owner of the skeleton).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

/// A one-shot timer the loader asked its host to arm.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u32);

impl HandleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl CardId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
