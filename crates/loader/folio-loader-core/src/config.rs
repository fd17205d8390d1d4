//! Loader configuration.

use serde::{Deserialize, Serialize};

/// Timing and selection knobs for [`crate::SequentialLoader`].
///
/// `is_mobile` is evaluated once by the page at startup and passed in here;
/// the loader never reads the viewport itself. Every field has a default, so
/// hosts may deserialize a partial object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Selects the shorter inter-item delay.
    pub is_mobile: bool,
    /// Pause between two completed images on desktop viewports.
    pub inter_item_delay_ms: u32,
    /// Pause between two completed images on mobile viewports.
    pub mobile_inter_item_delay_ms: u32,
    /// Ceiling on the time an image may spend loading before it is treated as stalled.
    pub load_timeout_ms: u32,
    /// Interval at which a loading image is re-probed for a silent decode.
    pub probe_interval_ms: u32,
    /// Delay after the page load signal before the fallback sweep runs.
    pub fallback_delay_ms: u32,
    /// Duration of the skeleton fade before its element is removed.
    pub skeleton_fade_ms: u32,
    /// How long a reveal class stays on a card.
    pub reveal_duration_ms: u32,
    /// Discovery margin around the viewport, in CSS pixels.
    pub root_margin_px: u32,
    /// Intersection ratio counting as "visible".
    pub intersection_threshold: f64,
    /// Images carrying this class are never managed by the loader.
    pub excluded_class: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            is_mobile: false,
            inter_item_delay_ms: 120,
            mobile_inter_item_delay_ms: 80,
            load_timeout_ms: 5_000,
            probe_interval_ms: 50,
            fallback_delay_ms: 3_000,
            skeleton_fade_ms: 300,
            reveal_duration_ms: 800,
            root_margin_px: 200,
            intersection_threshold: 0.01,
            excluded_class: "hero-large-image".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Defaults with the mobile flag set.
    pub fn for_viewport(is_mobile: bool) -> Self {
        Self {
            is_mobile,
            ..Self::default()
        }
    }

    /// Delay applied between two sequential loads.
    #[inline]
    pub fn inter_item_delay(&self) -> u32 {
        if self.is_mobile {
            self.mobile_inter_item_delay_ms
        } else {
            self.inter_item_delay_ms
        }
    }

    /// Intersection Observer `rootMargin` string.
    pub fn root_margin(&self) -> String {
        format!("{}px", self.root_margin_px)
    }

    /// True when a whitespace-separated class list names the excluded class.
    pub fn is_excluded(&self, class_list: &str) -> bool {
        class_list
            .split_whitespace()
            .any(|c| c == self.excluded_class)
    }
}
