use crate::backend::KvBackend;
use dashmap::DashMap;
use pocketlink_core::repository::Result;
use pocketlink_core::StorageError;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory implementation of [`KvBackend`] using DashMap.
///
/// An optional byte quota makes writes fail once the stored keys and values
/// would exceed it, and the backend can be switched offline to make every
/// call fail. Both exist to exercise the failure paths of the services.
#[derive(Debug)]
pub struct InMemoryBackend {
    storage: DashMap<String, String>,
    quota: Option<usize>,
    available: AtomicBool,
}

impl InMemoryBackend {
    /// Creates a new, unlimited in-memory backend.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
            quota: None,
            available: AtomicBool::new(true),
        }
    }

    /// Creates a backend that holds at most `bytes` of keys and values.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::new()
        }
    }

    /// Makes every subsequent call succeed (`true`) or fail with
    /// [`StorageError::Unavailable`] (`false`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns the raw stored value, bypassing availability.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.storage.get(key).map(|v| v.clone())
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::Unavailable("in-memory backend is offline".to_string()))
        }
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.storage
            .iter()
            .filter(|e| e.key() != key)
            .map(|e| e.key().len() + e.value().len())
            .sum()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl KvBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;

        if let Some(quota) = self.quota {
            let needed = self.used_bytes_excluding(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        self.storage.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
