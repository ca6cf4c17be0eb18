//! Durable key-value storage trait for credential backends.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for durable string key-value backends (in-memory, JSON file).
///
/// Batch writes and removals are atomic: a reader never observes part of
/// a batch. Identity slots rely on this to persist their four keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Short name of the backend, for logging.
    fn provider_type(&self) -> &str;

    /// Get a value by key. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Get several values in one consistent read.
    async fn get_many(&self, keys: &[&str]) -> AppResult<Vec<Option<String>>>;

    /// Write all entries as one atomic batch.
    async fn set_many(&self, entries: &[(&str, &str)]) -> AppResult<()>;

    /// Remove all keys as one atomic batch.
    async fn remove_many(&self, keys: &[&str]) -> AppResult<()>;

    /// Set a single value.
    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.set_many(&[(key, value)]).await
    }

    /// Remove a single key.
    async fn remove(&self, key: &str) -> AppResult<()> {
        self.remove_many(&[key]).await
    }

    /// Check that the backend is usable.
    async fn health_check(&self) -> AppResult<bool>;
}
