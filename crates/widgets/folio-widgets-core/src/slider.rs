//! 3D slider navigation state.
//!
//! Navigation requests are refused while a transition is running; the host
//! calls [`Slider::finish`] from the tween's completion callback.

use serde::{Deserialize, Serialize};

use crate::config::PageConfig;
use crate::error::WidgetError;
use crate::tween::{Ease, TweenSpec};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliderLayout {
    pub item_width: f64,
    pub gap: f64,
    pub duration: f64,
}

impl SliderLayout {
    pub fn for_page(page: &PageConfig) -> Self {
        if page.is_mobile {
            Self {
                item_width: 320.0,
                gap: 40.0,
                duration: 0.5,
            }
        } else {
            Self {
                item_width: 450.0,
                gap: 60.0,
                duration: 0.8,
            }
        }
    }
}

/// Visual class of an item by its distance from the current one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Active,
    Adjacent,
    Far,
}

impl Slot {
    pub const CLASSES: [&'static str; 3] = ["active", "adjacent", "far"];

    pub fn class(&self) -> &'static str {
        match self {
            Slot::Active => "active",
            Slot::Adjacent => "adjacent",
            Slot::Far => "far",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Slider {
    layout: SliderLayout,
    len: usize,
    index: usize,
    animating: bool,
}

impl Slider {
    pub fn new(len: usize, layout: SliderLayout) -> Self {
        Self {
            layout,
            len,
            index: 0,
            animating: false,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Start a transition to `index`. `Ok(false)` while another transition runs.
    pub fn go_to(&mut self, index: usize) -> Result<bool, WidgetError> {
        if index >= self.len {
            return Err(WidgetError::SlideOutOfRange {
                index,
                len: self.len,
            });
        }
        if self.animating {
            log::debug!("slider busy, ignoring move to {index}");
            return Ok(false);
        }
        self.index = index;
        self.animating = true;
        Ok(true)
    }

    pub fn next(&mut self) -> bool {
        if self.animating || self.index + 1 >= self.len {
            return false;
        }
        self.go_to(self.index + 1).unwrap_or(false)
    }

    pub fn prev(&mut self) -> bool {
        if self.animating || self.index == 0 {
            return false;
        }
        self.go_to(self.index - 1).unwrap_or(false)
    }

    /// The running transition completed.
    pub fn finish(&mut self) {
        self.animating = false;
    }

    /// Track translation that centers the current item in a container.
    pub fn offset(&self, container_width: f64) -> f64 {
        let SliderLayout {
            item_width, gap, ..
        } = self.layout;
        container_width / 2.0 - item_width / 2.0 - self.index as f64 * (item_width + gap)
    }

    /// Tween moving the track to the current item.
    pub fn track_tween(&self, container_width: f64) -> TweenSpec {
        TweenSpec::new(self.layout.duration)
            .x(self.offset(container_width))
            .ease(Ease::Power3Out)
    }

    pub fn slot(&self, item: usize) -> Slot {
        match item.abs_diff(self.index) {
            0 => Slot::Active,
            1 => Slot::Adjacent,
            _ => Slot::Far,
        }
    }

    /// Whether dot `dot` is the active one.
    #[inline]
    pub fn dot_active(&self, dot: usize) -> bool {
        dot == self.index
    }
}
