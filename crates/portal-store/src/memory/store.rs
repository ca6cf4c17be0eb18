//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use portal_core::result::AppResult;
use portal_core::traits::KeyValueStore;

/// In-memory storage provider.
///
/// Batches are applied under a single write lock, so readers see either
/// none or all of a batch.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// The stored entries.
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn get_many(&self, keys: &[&str]) -> AppResult<Vec<Option<String>>> {
        let entries = self.entries.read().await;
        Ok(keys.iter().map(|k| entries.get(*k).cloned()).collect())
    }

    async fn set_many(&self, batch: &[(&str, &str)]) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        for (key, value) in batch {
            entries.insert((*key).to_string(), (*value).to_string());
        }
        debug!(count = batch.len(), "Stored batch");
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(*key);
        }
        debug!(count = keys.len(), "Removed batch");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
