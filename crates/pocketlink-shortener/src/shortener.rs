use crate::row::{CreatedUrl, RowInput, RowResult};
use crate::ShortenerError;

pub trait Shortener: Send + Sync + 'static {
    /// Validates one row, picks its short code and stores it.
    fn shorten(&self, row: &RowInput) -> Result<CreatedUrl, ShortenerError>;

    /// Shortens every row independently. The output has one result per row,
    /// in input order; a failing row never affects its siblings.
    fn create_short_urls(&self, rows: &[RowInput]) -> Vec<RowResult> {
        rows.iter().map(|row| self.shorten(row)).collect()
    }
}
