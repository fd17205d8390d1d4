//! Page-wide flags, evaluated once at startup.

use serde::{Deserialize, Serialize};

/// Viewport width at or below which the page uses its mobile timings.
pub const MOBILE_MAX_WIDTH_PX: u32 = 768;
pub const MOBILE_QUERY: &str = "(max-width: 768px)";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub is_mobile: bool,
    pub prefers_reduced_motion: bool,
}

impl PageConfig {
    /// Build from a viewport width when media queries are unavailable.
    pub fn from_width(width_px: f64, prefers_reduced_motion: bool) -> Self {
        Self {
            is_mobile: width_px <= f64::from(MOBILE_MAX_WIDTH_PX),
            prefers_reduced_motion,
        }
    }

    /// The custom cursor only runs on desktop without reduced motion.
    pub fn cursor_enabled(&self) -> bool {
        !self.is_mobile && !self.prefers_reduced_motion
    }
}
