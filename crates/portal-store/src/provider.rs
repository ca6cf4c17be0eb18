//! Storage manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use portal_core::config::StorageConfig;
use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::traits::KeyValueStore;

/// Storage manager that wraps the configured key-value provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StorageManager {
    /// The inner storage provider.
    inner: Arc<dyn KeyValueStore>,
}

impl StorageManager {
    /// Create a new storage manager from configuration.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.provider.as_str() {
            #[cfg(feature = "file")]
            "file" => {
                info!(path = %config.file.path, "Initializing file credential store");
                Arc::new(crate::file::FileStore::open(&config.file.path).await?)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory credential store");
                Arc::new(crate::memory::MemoryStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: '{other}'. Supported: memory, file"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a storage manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: provider }
    }

    /// Get a reference to the inner provider.
    pub fn provider(&self) -> &dyn KeyValueStore {
        self.inner.as_ref()
    }
}

#[async_trait]
impl KeyValueStore for StorageManager {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn get_many(&self, keys: &[&str]) -> AppResult<Vec<Option<String>>> {
        self.inner.get_many(keys).await
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> AppResult<()> {
        self.inner.set_many(entries).await
    }

    async fn remove_many(&self, keys: &[&str]) -> AppResult<()> {
        self.inner.remove_many(keys).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
