//! URL shortener service implementation.
//!
//! [`ShortenerService`] turns a batch of submitted rows into stored short
//! URLs, one independent result per row.

pub mod error;
pub mod row;
pub mod service;
pub mod shortener;

pub use error::ShortenerError;
pub use row::{CreatedUrl, RowInput, RowResult, MAX_BATCH_ROWS};
pub use service::{ShortenerService, ShortenerSettings};
pub use shortener::Shortener;
