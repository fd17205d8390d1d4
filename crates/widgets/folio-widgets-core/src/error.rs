//! Error types for the widgets.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("unknown gallery filter '{0}'")]
    UnknownFilter(String),

    #[error("slider index {index} out of range (len {len})")]
    SlideOutOfRange { index: usize, len: usize },
}
