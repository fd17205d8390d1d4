//! Hover-to-play gallery videos.
//!
//! A video is dormant until it first nears the viewport; then its deferred
//! source is attached and hover playback is armed exactly once.

pub const VIDEO_SELECTOR: &str = ".video-item video";
pub const VIDEO_ITEM_SELECTOR: &str = ".video-item";
pub const VIDEO_ROOT_MARGIN: &str = "100px";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoGate {
    armed: bool,
}

impl VideoGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// First intersection only: returns the source to attach (if any) and
    /// marks the gate armed. Later calls return `None` and leave it armed.
    pub fn arm(&mut self, data_src: Option<&str>) -> Option<Option<String>> {
        if self.armed {
            return None;
        }
        self.armed = true;
        Some(
            data_src
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        )
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}
