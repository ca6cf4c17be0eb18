//! JSON-file key-value store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_core::traits::KeyValueStore;

/// Storage provider backed by a single JSON object on disk.
///
/// The whole document is kept in memory. Every batch is written to a
/// sibling temp file and renamed over the original, so the file on disk is
/// always either the old or the new document.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Location of the JSON document.
    path: PathBuf,
    /// In-memory copy of the document.
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl FileStore {
    /// Open the store, loading the document if it exists.
    ///
    /// A missing file is an empty store. A corrupt file is logged and
    /// treated as empty; it is replaced on the next write.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, String>>(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Credential file is corrupt; starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read credential file: {}", path.display()),
                    e,
                ));
            }
        };

        debug!(path = %path.display(), keys = entries.len(), "Opened credential file");
        Ok(Self {
            path,
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `entries` to disk via temp file + rename.
    async fn persist(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let json = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {}", tmp.display()),
                e,
            )
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace file: {}", self.path.display()),
                e,
            )
        })?;

        debug!(path = %self.path.display(), bytes = json.len(), "Persisted credential file");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn provider_type(&self) -> &str {
        "file"
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
        let mut next = entries.clone();
        for (key, value) in batch {
            next.insert((*key).to_string(), (*value).to_string());
        }
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        for key in keys {
            next.remove(*key);
        }
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => Ok(fs::metadata(parent).await.is_ok_and(|m| m.is_dir())),
            None => Ok(true),
        }
    }
}
