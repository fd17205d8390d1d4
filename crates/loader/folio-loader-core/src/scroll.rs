//! Scroll direction tracking and the reveal class it selects.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollDirection {
    Up,
    #[default]
    Down,
}

/// Directional entrance class applied to a card after its image loads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevealClass {
    FromBottom,
    FromTop,
}

impl RevealClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealClass::FromBottom => "reveal-from-bottom",
            RevealClass::FromTop => "reveal-from-top",
        }
    }
}

impl From<ScrollDirection> for RevealClass {
    fn from(dir: ScrollDirection) -> Self {
        match dir {
            ScrollDirection::Down => RevealClass::FromBottom,
            ScrollDirection::Up => RevealClass::FromTop,
        }
    }
}

/// Keeps the last vertical offset and the direction of the latest move.
#[derive(Clone, Debug, Default)]
pub struct ScrollTracker {
    last_y: f64,
    direction: ScrollDirection,
}

impl ScrollTracker {
    pub fn new(initial_y: f64) -> Self {
        Self {
            last_y: initial_y,
            direction: ScrollDirection::Down,
        }
    }

    /// Record a new offset. Only a strictly larger offset counts as down;
    /// an unchanged one (e.g. a scroll event at the page end) reads as up.
    pub fn observe(&mut self, y: f64) -> ScrollDirection {
        self.direction = if y > self.last_y {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        };
        self.last_y = y;
        self.direction
    }

    #[inline]
    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    #[inline]
    pub fn reveal_class(&self) -> RevealClass {
        self.direction.into()
    }
}
