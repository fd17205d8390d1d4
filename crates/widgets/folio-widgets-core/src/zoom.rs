//! Click-to-zoom overlay for "zoom match" items.

pub const ZOOM_ITEM_SELECTOR: &str = ".zoom-match-item";
/// Matches the CSS transition length of the overlay.
pub const ZOOM_CLOSE_MS: u32 = 800;

pub const OVERLAY_CSS: &str = "position: fixed; inset: 0; background: rgba(0,0,0,0); \
                               z-index: 9999; display: flex; align-items: center; \
                               justify-content: center; cursor: zoom-out;";
pub const ZOOMED_IMAGE_CSS: &str = "max-width: 90vw; max-height: 90vh; object-fit: contain; \
                                    transform: scale(0.5); opacity: 0; \
                                    transition: all 0.8s cubic-bezier(0.4, 0, 0.2, 1); \
                                    border-radius: 12px; box-shadow: 0 50px 100px rgba(0,0,0,0.8);";
pub const OVERLAY_OPEN_BACKGROUND: &str = "rgba(0,0,0,0.95)";
pub const OVERLAY_CLOSED_BACKGROUND: &str = "rgba(0,0,0,0)";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ZoomOverlay {
    #[default]
    Closed,
    Open,
    Closing,
}

impl ZoomOverlay {
    /// Returns false if an overlay is already showing.
    pub fn open(&mut self) -> bool {
        if *self != ZoomOverlay::Closed {
            return false;
        }
        *self = ZoomOverlay::Open;
        true
    }

    /// Begin the closing animation. Returns false unless open.
    pub fn close(&mut self) -> bool {
        if *self != ZoomOverlay::Open {
            return false;
        }
        *self = ZoomOverlay::Closing;
        true
    }

    /// The closing animation ended and the overlay was removed.
    pub fn removed(&mut self) {
        *self = ZoomOverlay::Closed;
    }
}
