use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Input validation errors.
///
/// The `Display` form of each variant is the message shown to the user,
/// the payload keeps the offending input for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("URL is required")]
    MissingUrl,
    #[error("Invalid URL. Must start with http(s).")]
    InvalidUrl(String),
    #[error("Validity must be an integer between 1 and 7200 minutes.")]
    InvalidValidity(String),
    #[error("Shortcode must be 3–20 chars, alphanumeric, - or _.")]
    InvalidShortCode(String),
    #[error("timestamp out of range: {0}")]
    TimeOverflow(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("storage serialization failed: {0}")]
    Serialization(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}
