//! Durable credential storage configuration.

use serde::{Deserialize, Serialize};

/// Selects and configures the backend that persists identity slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage provider type: `"memory"` or `"file"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// File provider settings.
    #[serde(default)]
    pub file: FileStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            file: FileStorageConfig::default(),
        }
    }
}

/// JSON-file backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStorageConfig {
    /// Path of the JSON document holding all keys.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_provider() -> String {
    "file".to_string()
}

fn default_path() -> String {
    "data/credentials.json".to_string()
}
