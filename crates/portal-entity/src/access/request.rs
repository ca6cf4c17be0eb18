//! Ephemeral permission requests.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Action, ModuleKey};

/// "May the current identity perform `action` on `module`?"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionRequest {
    /// Target module.
    pub module: ModuleKey,
    /// Requested action.
    pub action: Action,
}

impl PermissionRequest {
    /// Build a request from raw names.
    pub fn new(module: &str, action: &str) -> Self {
        Self {
            module: ModuleKey::new(module),
            action: Action::new(action),
        }
    }

    /// A `view` request for a module.
    pub fn view(module: &str) -> Self {
        Self::new(module, Action::VIEW)
    }
}

impl fmt::Display for PermissionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.action)
    }
}
