//! Tween descriptions handed to the animation-timeline library.
//!
//! `TweenSpec` serializes to the plain vars object the library expects
//! (`{ opacity: 1, duration: 0.5, ease: "power2.out" }`); unset fields are
//! omitted rather than sent as `undefined`.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ease {
    #[serde(rename = "power2.in")]
    Power2In,
    #[serde(rename = "power2.out")]
    Power2Out,
    #[serde(rename = "power2.inOut")]
    Power2InOut,
    #[serde(rename = "power3.out")]
    Power3Out,
    #[serde(rename = "power3.inOut")]
    Power3InOut,
}

/// `gsap.to` or `gsap.from`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TweenMethod {
    To,
    From,
}

/// Placement of a tween inside a timeline.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Position {
    /// Appended at the current end of the timeline.
    Sequential,
    /// Same start as the previously added tween (`"<"`).
    WithPrevious,
    /// Starts this many seconds before the current end (`"-=x"`).
    Overlap(f64),
}

impl Position {
    /// Position parameter for the timeline call, `None` for the default.
    pub fn to_param(&self) -> Option<String> {
        match self {
            Position::Sequential => None,
            Position::WithPrevious => Some("<".to_string()),
            Position::Overlap(secs) => Some(format!("-={secs}")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TweenSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Plain numeric property, used when tweening a counter object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
}

impl TweenSpec {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            ..Self::default()
        }
    }

    /// Instant property set (`gsap.set`).
    pub fn set() -> Self {
        Self::default()
    }

    pub fn opacity(mut self, v: f64) -> Self {
        self.opacity = Some(v);
        self
    }

    pub fn x(mut self, v: f64) -> Self {
        self.x = Some(v);
        self
    }

    pub fn y(mut self, v: f64) -> Self {
        self.y = Some(v);
        self
    }

    pub fn scale(mut self, v: f64) -> Self {
        self.scale = Some(v);
        self
    }

    pub fn width(mut self, v: &str) -> Self {
        self.width = Some(v.to_string());
        self
    }

    pub fn height(mut self, v: &str) -> Self {
        self.height = Some(v.to_string());
        self
    }

    pub fn display(mut self, v: &str) -> Self {
        self.display = Some(v.to_string());
        self
    }

    pub fn value(mut self, v: f64) -> Self {
        self.value = Some(v);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    #[inline]
    pub fn seconds(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }
}

/// Start time of each `(duration, position)` entry, following the
/// timeline library's placement rules: the end of a timeline is the latest
/// end of anything already added.
pub fn resolve_starts(items: impl IntoIterator<Item = (f64, Position)>) -> Vec<f64> {
    let mut starts = Vec::new();
    let mut end: f64 = 0.0;
    let mut previous_start = 0.0;
    for (duration, position) in items {
        let start = match position {
            Position::Sequential => end,
            Position::WithPrevious => previous_start,
            Position::Overlap(secs) => (end - secs).max(0.0),
        };
        end = end.max(start + duration);
        previous_start = start;
        starts.push(start);
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_params() {
        assert_eq!(Position::Sequential.to_param(), None);
        assert_eq!(Position::WithPrevious.to_param().as_deref(), Some("<"));
        assert_eq!(Position::Overlap(0.3).to_param().as_deref(), Some("-=0.3"));
    }

    #[test]
    fn starts_follow_timeline_rules() {
        let starts = resolve_starts([
            (1.0, Position::Sequential),
            (2.0, Position::Sequential),
            (2.0, Position::WithPrevious),
            (0.5, Position::Overlap(0.25)),
        ]);
        assert_eq!(starts, vec![0.0, 1.0, 1.0, 2.75]);
    }
}
