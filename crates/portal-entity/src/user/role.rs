//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::identity::SlotName;

/// Roles known to the portal.
///
/// The backend owns the role vocabulary, so unrecognised strings are kept
/// verbatim in [`Role::Other`] instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Platform owner; bypasses every access check.
    SuperAdmin,
    /// System operator; bypasses every access check.
    SystemAdmin,
    /// Regular back-office administrator.
    Admin,
    /// Back-office content editor.
    Editor,
    /// Customer-facing client account.
    Client,
    /// Any other role string sent by the backend.
    Other(String),
}

impl Role {
    /// Whether this role is allowed everything without consulting the
    /// access directory.
    ///
    /// This is the only bypass predicate; the decision procedure, route
    /// guard, and navigation filter all go through it.
    pub fn has_global_bypass(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::SystemAdmin)
    }

    /// The identity slot a session with this role is stored in.
    pub fn slot(&self) -> SlotName {
        match self {
            // system_admin bypasses like super_admin, so it shares the back-office slot.
            Self::SuperAdmin | Self::SystemAdmin | Self::Admin | Self::Editor => SlotName::Admin,
            Self::Client | Self::Other(_) => SlotName::Client,
        }
    }

    /// Return the role as the backend spells it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::SystemAdmin => "system_admin",
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Client => "client",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exact match: only the backend's spelling earns a known role.
        Ok(match s {
            "super_admin" => Self::SuperAdmin,
            "system_admin" => Self::SystemAdmin,
            "admin" => Self::Admin,
            "editor" => Self::Editor,
            "client" => Self::Client,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(role) => role,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}
