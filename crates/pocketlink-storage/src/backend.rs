use pocketlink_core::repository::Result;
use std::sync::Arc;

/// A persistent string key-value slot store.
///
/// Values are whole documents; there is no partial update.
pub trait KvBackend: Send + Sync + 'static {
    /// Returns the value stored under `key`, or `None` if nothing is.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<B: KvBackend + ?Sized> KvBackend for Arc<B> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
