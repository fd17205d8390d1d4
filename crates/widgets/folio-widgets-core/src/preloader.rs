//! Preloader timeline plan and counter-driven letter brightening.

use serde::{Deserialize, Serialize};

use crate::tween::{resolve_starts, Ease, Position, TweenMethod, TweenSpec};

/// Letters start this dim and brighten as loading progresses past them.
const LETTER_BASE_OPACITY: f64 = 0.2;
/// How fast a letter reaches full opacity once progress passes it.
const LETTER_GAIN: f64 = 5.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreloaderTarget {
    LoadingBarContainer,
    LoadingBar,
    /// The percentage counter object, not an element.
    Counter,
    /// Empty tween used as a hold.
    Pause,
    PreloaderText,
    Preloader,
    Navbar,
    Hero,
    HeroTitle,
    HeroSubtitle,
}

impl PreloaderTarget {
    /// CSS selector of the tweened element, `None` for non-element targets.
    pub fn selector(&self) -> Option<&'static str> {
        match self {
            PreloaderTarget::LoadingBarContainer => Some("#loading-bar-container"),
            PreloaderTarget::LoadingBar => Some("#loading-bar"),
            PreloaderTarget::Counter | PreloaderTarget::Pause => None,
            PreloaderTarget::PreloaderText => Some("#preloader-text"),
            PreloaderTarget::Preloader => Some("#preloader"),
            PreloaderTarget::Navbar => Some("#navbar"),
            PreloaderTarget::Hero => Some("#hero"),
            PreloaderTarget::HeroTitle => Some(".hero-title"),
            PreloaderTarget::HeroSubtitle => Some(".hero-subtitle"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub target: PreloaderTarget,
    pub method: TweenMethod,
    pub vars: TweenSpec,
    pub position: Position,
}

impl Step {
    fn tween_to(target: PreloaderTarget, vars: TweenSpec, position: Position) -> Self {
        Self {
            target,
            method: TweenMethod::To,
            vars,
            position,
        }
    }

    fn tween_from(target: PreloaderTarget, vars: TweenSpec, position: Position) -> Self {
        Self {
            target,
            method: TweenMethod::From,
            vars,
            position,
        }
    }
}

/// Full preloader timeline for a viewport of the given size.
///
/// The text travels from the screen center to the logo slot in the top-left
/// corner, so its offsets depend on the viewport.
pub fn preloader_plan(viewport_width: f64, viewport_height: f64) -> Vec<Step> {
    use PreloaderTarget::*;
    use Position::*;

    vec![
        Step::tween_to(
            LoadingBarContainer,
            TweenSpec::new(0.4).opacity(1.0).ease(Ease::Power2Out),
            Sequential,
        ),
        Step::tween_to(
            LoadingBar,
            TweenSpec::new(2.5).width("100%").ease(Ease::Power2InOut),
            Sequential,
        ),
        Step::tween_to(
            Counter,
            TweenSpec::new(2.5).value(100.0).ease(Ease::Power2InOut),
            WithPrevious,
        ),
        Step::tween_to(Pause, TweenSpec::new(0.3), Sequential),
        Step::tween_to(
            LoadingBarContainer,
            TweenSpec::new(0.3).opacity(0.0).ease(Ease::Power2In),
            Sequential,
        ),
        Step::tween_to(
            PreloaderText,
            TweenSpec::new(1.0)
                .x(-viewport_width / 2.0 + 150.0)
                .y(-viewport_height / 2.0 + 50.0)
                .scale(0.4)
                .ease(Ease::Power3InOut),
            Overlap(0.1),
        ),
        Step::tween_to(
            Preloader,
            TweenSpec::new(0.5).opacity(0.0).ease(Ease::Power2Out),
            Overlap(0.3),
        ),
        Step::tween_to(
            Navbar,
            TweenSpec::new(0.6).opacity(1.0).y(0.0).ease(Ease::Power2Out),
            Overlap(0.4),
        ),
        Step::tween_to(
            Hero,
            TweenSpec::new(0.8).opacity(1.0).ease(Ease::Power2Out),
            Overlap(0.5),
        ),
        Step::tween_from(
            HeroTitle,
            TweenSpec::new(1.0).y(100.0).opacity(0.0).ease(Ease::Power3Out),
            Overlap(0.6),
        ),
        Step::tween_from(
            HeroSubtitle,
            TweenSpec::new(0.8).y(50.0).opacity(0.0).ease(Ease::Power3Out),
            Overlap(0.7),
        ),
    ]
}

/// Seconds until the plan completes.
pub fn plan_duration(plan: &[Step]) -> f64 {
    let starts = resolve_starts(plan.iter().map(|s| (s.vars.seconds(), s.position)));
    starts
        .iter()
        .zip(plan)
        .map(|(start, step)| start + step.vars.seconds())
        .fold(0.0, f64::max)
}

/// Opacity of letter `index` of `count` at loading progress `progress` (0..=1).
/// `None` while progress has not reached the letter yet.
pub fn letter_opacity(index: usize, count: usize, progress: f64) -> Option<f64> {
    if count == 0 {
        return None;
    }
    let threshold = index as f64 / count as f64;
    if progress < threshold {
        return None;
    }
    Some((LETTER_BASE_OPACITY + (progress - threshold) * LETTER_GAIN).min(1.0))
}

/// Counter label, e.g. `"42%"`.
pub fn percent_label(value: f64) -> String {
    format!("{}%", value.clamp(0.0, 100.0).floor() as u32)
}
