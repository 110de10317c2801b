use crate::backend::KvBackend;
use pocketlink_core::repository::{ReadRepository, Repository, Result};
use pocketlink_core::{
    ClickEvent, Clock, EventLogger, ShortCode, StorageError, StoreDocument, SystemClock, UrlEntry,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Key the store document lives under.
pub const STORAGE_KEY: &str = "urlShortener.data";

/// Repository keeping the whole store as one JSON document in a
/// [`KvBackend`] slot.
///
/// Every operation reads the full document, works on it in memory and, for
/// writes, stores it back in full. Nothing is cached between calls. The
/// read-modify-write cycle is not guarded against concurrent writers; the
/// repository assumes a single caller.
pub struct DocumentRepository<B> {
    backend: B,
    key: String,
    clock: Arc<dyn Clock>,
    logger: EventLogger,
}

impl<B: KvBackend> DocumentRepository<B> {
    /// Creates a repository over `backend` using the system clock and no
    /// event logging.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            key: STORAGE_KEY.to_string(),
            clock: Arc::new(SystemClock),
            logger: EventLogger::noop(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_logger(mut self, logger: EventLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Stores the document under `key` instead of [`STORAGE_KEY`].
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Returns a reference to the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Probes the backend. Returns `false`, and logs `storage_unavailable`,
    /// if it cannot be read.
    pub fn ensure_init(&self) -> bool {
        match self.backend.get(&self.key) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "storage backend unavailable");
                self.logger.warn(
                    "storage_unavailable",
                    json!({ "reason": "backend_not_available", "error": e.to_string() }),
                );
                false
            }
        }
    }

    fn read(&self) -> StoreDocument {
        match self.backend.get(&self.key) {
            Ok(raw) => self.parse(raw),
            Err(e) => self.read_failed(e),
        }
    }

    /// Reads the document a write will replace. A backend fault is returned
    /// so the write never overwrites a store it could not see; a corrupt
    /// document still reads as empty.
    fn read_for_update(&self) -> Result<StoreDocument> {
        let raw = self.backend.get(&self.key).inspect_err(|e| {
            warn!(error = %e, "store document unreadable, aborting write");
            self.logger
                .error("storage_read_error", json!({ "error": e.to_string() }));
        })?;
        Ok(self.parse(raw))
    }

    fn parse(&self, raw: Option<String>) -> StoreDocument {
        let Some(raw) = raw else {
            return StoreDocument::empty(self.clock.now());
        };

        match serde_json::from_str::<StoreDocument>(&raw) {
            Ok(doc) => drop_mismatched_keys(doc),
            Err(e) => self.read_failed(StorageError::Serialization(e.to_string())),
        }
    }

    fn read_failed(&self, err: StorageError) -> StoreDocument {
        warn!(error = %err, "store document unreadable, treating as empty");
        self.logger
            .error("storage_read_error", json!({ "error": err.to_string() }));
        StoreDocument::empty(self.clock.now())
    }

    fn write(&self, mut doc: StoreDocument) -> Result<()> {
        doc.meta.last_updated = self.clock.now();

        let result = serde_json::to_string(&doc)
            .map_err(|e| StorageError::Serialization(e.to_string()))
            .and_then(|raw| self.backend.set(&self.key, &raw));

        if let Err(e) = &result {
            warn!(error = %e, "failed to write store document");
            self.logger
                .error("storage_write_error", json!({ "error": e.to_string() }));
        }
        result
    }
}

/// Keeps the `key == entry.shortcode` invariant by discarding entries that
/// break it.
fn drop_mismatched_keys(mut doc: StoreDocument) -> StoreDocument {
    doc.urls.retain(|key, entry| {
        let matches = *key == entry.shortcode;
        if !matches {
            warn!(key = %key, shortcode = %entry.shortcode, "dropping entry stored under a foreign key");
        }
        matches
    });
    doc
}

impl<B: KvBackend> ReadRepository for DocumentRepository<B> {
    fn get_all(&self) -> StoreDocument {
        self.read()
    }

    fn get_by_shortcode(&self, code: &ShortCode) -> Option<UrlEntry> {
        self.read().urls.remove(code)
    }

    fn is_shortcode_taken(&self, code: &ShortCode) -> bool {
        self.read().urls.contains_key(code)
    }
}

impl<B: KvBackend> Repository for DocumentRepository<B> {
    fn upsert_url_entry(&self, entry: UrlEntry) -> Result<()> {
        let code = entry.shortcode.clone();
        let mut doc = self.read_for_update()?;
        doc.urls.insert(code.clone(), entry);

        self.write(doc)?;
        debug!(code = %code, "stored url entry");
        self.logger
            .info("storage_url_saved", json!({ "shortcode": code }));
        Ok(())
    }

    fn record_click(&self, code: &ShortCode, event: ClickEvent) -> Result<u64> {
        let mut doc = self.read_for_update()?;
        let Some(entry) = doc.urls.get_mut(code) else {
            trace!(code = %code, "click for unknown short code");
            self.logger.warn(
                "storage_click_record_failed",
                json!({ "code": code, "reason": "entry_not_found" }),
            );
            return Err(StorageError::NotFound(code.to_string()));
        };

        entry.clicks += 1;
        entry.click_events.push(event);
        let total = entry.clicks;

        self.write(doc)?;
        self.logger.info(
            "storage_click_recorded",
            json!({ "code": code, "totalClicks": total }),
        );
        Ok(total)
    }

    fn delete_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut doc = self.read_for_update()?;

        let before = doc.urls.len();
        doc.urls.retain(|_, entry| !entry.is_expired(now));
        let deleted = before - doc.urls.len();

        if deleted > 0 {
            self.write(doc)?;
            debug!(deleted, "swept expired entries");
            self.logger
                .info("storage_expired_cleaned", json!({ "deletedCount": deleted }));
        }

        Ok(deleted)
    }
}
