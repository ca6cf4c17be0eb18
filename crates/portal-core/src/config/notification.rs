//! Notification configuration.

use serde::{Deserialize, Serialize};

/// Controls de-duplication of transport error notices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Minimum gap between two shown notices, in milliseconds.
    #[serde(default = "default_window")]
    pub dedup_window_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dedup_window_ms: default_window(),
        }
    }
}

fn default_window() -> u64 {
    3000
}
