//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Settings for the `tracing` subscriber installed by the binary.
///
/// `RUST_LOG`, when set, takes precedence over `level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `"info"` or `"portal_auth=debug,info"`.
    #[serde(default = "default_level")]
    pub level: String,
    /// `"json"` for machine-readable lines; anything else prints pretty.
    #[serde(default = "default_format")]
    pub format: String,
}

impl LoggingConfig {
    /// Whether log lines should be emitted as JSON.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}
