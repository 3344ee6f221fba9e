#![forbid(unsafe_code)]

//! Card configuration errors.

/// A caller precondition violated while building or querying a card.
///
/// Chainable builder methods log these and carry on; the `try_` variants
/// return them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CardError {
    #[error("text input index {index} out of range ({count} text inputs on card)")]
    InputOutOfRange { index: usize, count: usize },
    #[error("action index {index} out of range ({count} actions on card)")]
    ActionOutOfRange { index: usize, count: usize },
    #[error("image `{name}` needs a positive size, got {width}x{height}")]
    InvalidImageSize { name: String, width: f32, height: f32 },
}
