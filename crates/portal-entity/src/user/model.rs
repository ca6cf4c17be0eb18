//! User record as returned by the backend.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// A signed-in user.
///
/// Only `uuid`, `role`, and `name` are interpreted; every other field the
/// backend sends is kept in `extra` so the record round-trips through
/// durable storage unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Backend identifier used to fetch the access directory.
    pub uuid: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Assigned role.
    pub role: Role,
    /// Account status as the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
    /// Uninterpreted fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserRecord {
    /// Build a record with no extra fields.
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            uuid: uuid.into(),
            name: Some(name.into()),
            role,
            status: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Whether the record carries a usable uuid.
    pub fn has_uuid(&self) -> bool {
        !self.uuid.trim().is_empty()
    }
}

/// Payload of a successful `POST login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    /// The authenticated user.
    pub user: UserRecord,
    /// Bearer credential for subsequent requests; empty on a profile
    /// refresh.
    #[serde(default)]
    pub token: String,
}
