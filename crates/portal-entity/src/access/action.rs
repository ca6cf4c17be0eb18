//! Actions within a module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named operation within a module, e.g. `view` or `edit`.
///
/// Action names are compared exactly; the backend sends them lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(String);

impl Action {
    /// Read access; also the action navigation visibility is checked with.
    pub const VIEW: &'static str = "view";
    /// Create records.
    pub const CREATE: &'static str = "create";
    /// Edit records.
    pub const EDIT: &'static str = "edit";
    /// Delete records.
    pub const DELETE: &'static str = "delete";
    /// Toggle record status.
    pub const STATUS: &'static str = "status";

    /// Wrap an action name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The `view` action.
    pub fn view() -> Self {
        Self::new(Self::VIEW)
    }

    /// The action name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::view()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Action {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
