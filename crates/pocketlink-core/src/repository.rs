use crate::error::StorageError;
use crate::model::{ClickEvent, StoreDocument, UrlEntry};
use crate::shortcode::ShortCode;

/// Result type for repository writes.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a repository.
///
/// Reads never fail: storage that is missing, unreadable or corrupt reads
/// as an empty store.
pub trait ReadRepository: Send + Sync + 'static {
    /// Returns the whole store document.
    fn get_all(&self) -> StoreDocument;

    /// Retrieves the entry for a given short code.
    /// Returns `None` if the code does not exist.
    fn get_by_shortcode(&self, code: &ShortCode) -> Option<UrlEntry>;

    /// Checks whether a short code already exists in the repository.
    /// Expired entries still count until they are swept.
    fn is_shortcode_taken(&self, code: &ShortCode) -> bool;
}

pub trait Repository: ReadRepository {
    /// Inserts the entry, replacing any entry with the same short code.
    fn upsert_url_entry(&self, entry: UrlEntry) -> Result<()>;

    /// Appends `event` to the entry's history and bumps its click count.
    ///
    /// Returns the new click total, or `Err(NotFound)` without touching
    /// storage if the code does not exist.
    fn record_click(&self, code: &ShortCode, event: ClickEvent) -> Result<u64>;

    /// Removes every entry whose expiry is at or before now and returns how
    /// many were removed. Storage is only written when something was removed.
    fn delete_expired(&self) -> Result<usize>;
}

impl<R: ReadRepository + ?Sized> ReadRepository for std::sync::Arc<R> {
    fn get_all(&self) -> StoreDocument {
        (**self).get_all()
    }

    fn get_by_shortcode(&self, code: &ShortCode) -> Option<UrlEntry> {
        (**self).get_by_shortcode(code)
    }

    fn is_shortcode_taken(&self, code: &ShortCode) -> bool {
        (**self).is_shortcode_taken(code)
    }
}

impl<R: Repository + ?Sized> Repository for std::sync::Arc<R> {
    fn upsert_url_entry(&self, entry: UrlEntry) -> Result<()> {
        (**self).upsert_url_entry(entry)
    }

    fn record_click(&self, code: &ShortCode, event: ClickEvent) -> Result<u64> {
        (**self).record_click(code, event)
    }

    fn delete_expired(&self) -> Result<usize> {
        (**self).delete_expired()
    }
}
