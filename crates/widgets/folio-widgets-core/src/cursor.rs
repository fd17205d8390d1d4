//! Custom cursor that eases toward the pointer each frame.

/// Fraction of the remaining distance covered per frame.
pub const CURSOR_SMOOTHING: f64 = 0.15;
pub const CURSOR_CLASS: &str = "custom-cursor";
pub const CURSOR_HOVER_CLASS: &str = "cursor-hover";
pub const CURSOR_HOVER_SELECTOR: &str = "a, button, .gallery-item";

#[derive(Clone, Debug)]
pub struct CursorFollower {
    target: (f64, f64),
    position: (f64, f64),
    smoothing: f64,
}

impl Default for CursorFollower {
    fn default() -> Self {
        Self::new(CURSOR_SMOOTHING)
    }
}

impl CursorFollower {
    pub fn new(smoothing: f64) -> Self {
        Self {
            target: (0.0, 0.0),
            position: (0.0, 0.0),
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    pub fn set_target(&mut self, x: f64, y: f64) {
        self.target = (x, y);
    }

    /// Advance one frame and return the new position.
    pub fn step(&mut self) -> (f64, f64) {
        let (tx, ty) = self.target;
        let (x, y) = self.position;
        self.position = (
            x + (tx - x) * self.smoothing,
            y + (ty - y) * self.smoothing,
        );
        self.position
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    /// CSS transform for the current position.
    pub fn transform(&self) -> String {
        let (x, y) = self.position;
        format!("translate3d({x}px, {y}px, 0)")
    }
}
