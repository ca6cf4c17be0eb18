//! Maps a URL path to the identity slot it runs under.

use serde::Serialize;

use portal_entity::{IdentitySlot, Role, SlotName, UserRecord};

use crate::session::SlotPair;

/// Prefix owned by the client slot.
const CLIENT_PREFIX: &str = "/client";

/// Whether `path` belongs to the client slot.
///
/// True for `/client` itself and anything below `/client/`; `/clients` and
/// `/client-area` are admin paths.
pub fn is_client_path(path: &str) -> bool {
    match path.strip_prefix(CLIENT_PREFIX) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// The slot selected for a path, borrowed from the session state.
#[derive(Debug, Clone, Copy)]
pub struct ActiveIdentity<'a> {
    /// Which slot is active.
    pub slot_name: SlotName,
    /// Its contents.
    pub slot: &'a IdentitySlot,
    /// Whether the path is a client path.
    pub is_client: bool,
}

/// Pick the active slot for `path`.
///
/// Deterministic and side-effect free; anything outside `/client` is admin
/// context, including shared pages such as error routes.
pub fn resolve_identity<'a>(path: &str, slots: &'a SlotPair) -> ActiveIdentity<'a> {
    let is_client = is_client_path(path);
    let slot_name = if is_client {
        SlotName::Client
    } else {
        SlotName::Admin
    };
    ActiveIdentity {
        slot_name,
        slot: slots.get(slot_name),
        is_client,
    }
}

/// Normalized view of the active identity, with display fallbacks applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityView {
    /// Whether the client slot is active.
    pub is_client: bool,
    /// `"admin"` or `"client"`.
    pub auth_type: SlotName,
    /// Whether a credential is held.
    pub is_authenticated: bool,
    /// The stored user record.
    pub user: Option<UserRecord>,
    /// The user's uuid.
    pub uuid: Option<String>,
    /// Name to show; falls back to the slot's default.
    pub display_name: String,
    /// Role; falls back to the slot's default.
    pub role: Role,
    /// Account status as the backend reports it.
    pub status: Option<serde_json::Value>,
}

impl From<ActiveIdentity<'_>> for IdentityView {
    fn from(active: ActiveIdentity<'_>) -> Self {
        let slot = active.slot;
        let user = slot.user.as_ref();
        let display_name = user
            .and_then(|u| u.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| active.slot_name.default_display_name().to_string());
        let role = slot
            .role
            .clone()
            .or_else(|| user.map(|u| u.role.clone()))
            .unwrap_or_else(|| active.slot_name.default_role());

        Self {
            is_client: active.is_client,
            auth_type: active.slot_name,
            is_authenticated: slot.authenticated,
            user: slot.user.clone(),
            uuid: slot.uuid().map(str::to_string),
            display_name,
            role,
            status: user.and_then(|u| u.status.clone()),
        }
    }
}
