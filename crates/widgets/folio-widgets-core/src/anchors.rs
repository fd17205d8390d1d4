//! In-page anchor links scroll smoothly below the fixed navbar.

pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";
/// Height reserved for the fixed navbar.
pub const NAVBAR_OFFSET_PX: f64 = 80.0;

/// Selector to scroll to for an anchor `href`; `None` for a bare `#`.
pub fn anchor_target(href: &str) -> Option<&str> {
    let href = href.trim();
    if href.len() > 1 && href.starts_with('#') {
        Some(href)
    } else {
        None
    }
}

/// Scroll position that puts an element with `offset_top` just below the navbar.
pub fn scroll_top_for(offset_top: f64) -> f64 {
    offset_top - NAVBAR_OFFSET_PX
}
