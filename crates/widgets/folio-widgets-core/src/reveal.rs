//! Scroll-triggered entrance of page sections.

use crate::config::PageConfig;
use crate::tween::{Ease, TweenSpec};

pub const REVEAL_SELECTOR: &str = ".gallery-section, .zoom-match-item, .morph-item";

/// How sections enter the viewport.
#[derive(Clone, Debug, PartialEq)]
pub enum ScrollReveal {
    /// Reduced motion: make everything visible immediately, observe nothing.
    Immediate { shown: TweenSpec },
    Animated {
        initial: TweenSpec,
        enter: TweenSpec,
        threshold: f64,
    },
}

impl ScrollReveal {
    pub fn for_page(page: &PageConfig) -> Self {
        if page.prefers_reduced_motion {
            return ScrollReveal::Immediate {
                shown: TweenSpec::set().opacity(1.0),
            };
        }
        let duration = if page.is_mobile { 0.3 } else { 0.6 };
        ScrollReveal::Animated {
            initial: TweenSpec::set().opacity(0.0).y(20.0),
            enter: TweenSpec::new(duration)
                .opacity(1.0)
                .y(0.0)
                .ease(Ease::Power2Out),
            threshold: 0.1,
        }
    }
}
