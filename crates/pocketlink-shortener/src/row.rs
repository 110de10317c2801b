use crate::error::ShortenerError;
use jiff::Timestamp;
use pocketlink_core::ShortCode;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Most rows a single submission may carry.
pub const MAX_BATCH_ROWS: usize = 5;

/// One submitted row: a long URL plus optional validity (minutes, as typed)
/// and custom shortcode.
#[derive(Debug, Clone, Default, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
pub struct RowInput {
    #[builder(setter(into))]
    pub url: String,
    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    pub validity: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    pub shortcode: Option<String>,
}

impl RowInput {
    /// A row whose URL is blank. Callers drop these before submitting.
    pub fn is_blank(&self) -> bool {
        self.url.trim().is_empty()
    }
}

/// A successfully stored short URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUrl {
    pub shortcode: ShortCode,
    pub long_url: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Outcome of one row of a batch.
pub type RowResult = Result<CreatedUrl, ShortenerError>;
