use pocketlink_core::{CoreError, ShortCode, StorageError};
use thiserror::Error;

/// Why a single row could not be shortened.
///
/// `Display` yields the message shown next to the row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenerError {
    #[error("Invalid URL. Must start with http(s).")]
    InvalidUrl(String),
    #[error("Validity must be an integer between 1 and 7200 minutes.")]
    InvalidValidity(String),
    #[error("Shortcode must be 3–20 chars, alphanumeric, - or _.")]
    InvalidShortCode(String),
    #[error("Shortcode already in use.")]
    AliasConflict(ShortCode),
    #[error("Failed to generate a unique shortcode. Try again.")]
    GenerationExhausted { attempts: usize },
    #[error("Failed to save URL. Please try again.")]
    Storage(#[from] StorageError),
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::MissingUrl => Self::InvalidUrl(String::new()),
            CoreError::InvalidUrl(url) => Self::InvalidUrl(url),
            CoreError::InvalidValidity(raw) => Self::InvalidValidity(raw),
            CoreError::InvalidShortCode(code) => Self::InvalidShortCode(code),
            CoreError::TimeOverflow(message) => Self::InvalidValidity(message),
        }
    }
}
