//! Case-insensitive module names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A module name normalized to lowercase.
///
/// `"Users"`, `"users"`, and `"USERS"` are the same module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ModuleKey(String);

impl ModuleKey {
    /// Normalize a module name.
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    /// The normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModuleKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ModuleKey {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<ModuleKey> for String {
    fn from(key: ModuleKey) -> Self {
        key.0
    }
}
