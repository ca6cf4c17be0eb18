//! Identity slot names and contents.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::user::{Role, UserRecord};

/// Name of one of the two independent sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotName {
    /// Back-office session; its routes live at the root.
    Admin,
    /// Customer session; its routes live under `/client`.
    Client,
}

impl SlotName {
    /// Both slots, admin first.
    pub const ALL: [SlotName; 2] = [SlotName::Admin, SlotName::Client];

    /// Return the slot name as a lowercase string.
    ///
    /// Also used as the durable storage key prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Client => "client",
        }
    }

    /// URL prefix of every route that belongs to this slot.
    pub fn base_path(&self) -> &'static str {
        match self {
            Self::Admin => "",
            Self::Client => "/client",
        }
    }

    /// Prefix an admin-context route with this slot's base path.
    pub fn scoped(&self, route: &str) -> String {
        let route = if route.starts_with('/') {
            route.to_string()
        } else {
            format!("/{route}")
        };
        format!("{}{}", self.base_path(), route)
    }

    /// Display name used when the stored user has none.
    pub fn default_display_name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Client => "Client",
        }
    }

    /// Role assumed when the stored user has none.
    pub fn default_role(&self) -> Role {
        match self {
            Self::Admin => Role::Admin,
            Self::Client => Role::Client,
        }
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One stored session.
///
/// `authenticated` is true iff `token` is present; the constructors keep
/// that invariant and the fields are only rewritten as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentitySlot {
    /// Signed-in user, if any.
    pub user: Option<UserRecord>,
    /// Bearer credential, if any.
    pub token: Option<String>,
    /// Copy of `user.role` for quick access.
    pub role: Option<Role>,
    /// Whether a credential is held.
    pub authenticated: bool,
}

impl IdentitySlot {
    /// An empty, signed-out slot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A slot holding a user and optionally a credential.
    pub fn new(user: Option<UserRecord>, token: Option<String>) -> Self {
        let token = token.filter(|t| !t.is_empty());
        let role = user.as_ref().map(|u| u.role.clone());
        Self {
            authenticated: token.is_some(),
            user,
            token,
            role,
        }
    }

    /// A signed-in slot.
    pub fn signed_in(user: UserRecord, token: impl Into<String>) -> Self {
        Self::new(Some(user), Some(token.into()))
    }

    /// The user's uuid without surrounding whitespace, if a user with a
    /// non-empty uuid is present.
    ///
    /// Every directory lookup keys off this value.
    pub fn uuid(&self) -> Option<&str> {
        self.user
            .as_ref()
            .filter(|u| u.has_uuid())
            .map(|u| u.uuid.trim())
    }

    /// Whether the slot holds nothing at all.
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.token.is_none()
    }
}
