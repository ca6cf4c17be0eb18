//! The access decision procedure.
//!
//! Resolution order, first match wins:
//! 1. No user in the active slot; deny.
//! 2. Global bypass role; allow, even while the directory is loading.
//! 3. Directory not loaded for this identity, or its fetch failed; deny.
//! 4. Role-module allow-list excludes the module (when gated); deny.
//! 5. Permission map lacks the action; deny.
//! 6. Allow.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use portal_entity::{IdentitySlot, PermissionRequest};

use super::cache::{DirectorySnapshot, FetchPhase};

/// Whether the role-module allow-list takes part in a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleGating {
    /// Module must be in the role's allow-list.
    Enforced,
    /// Only the per-user permission map is consulted.
    Skipped,
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDenial {
    /// The active slot has no user.
    NoIdentity,
    /// The directory has not finished loading.
    DirectoryNotLoaded,
    /// The directory fetch failed.
    DirectoryFetchFailed,
    /// The role may not see the module at all.
    RoleModuleExcluded,
    /// The module does not grant the action.
    ActionNotGranted,
}

impl AccessDenial {
    /// Return the denial as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoIdentity => "no_identity",
            Self::DirectoryNotLoaded => "directory_not_loaded",
            Self::DirectoryFetchFailed => "directory_fetch_failed",
            Self::RoleModuleExcluded => "role_module_excluded",
            Self::ActionNotGranted => "action_not_granted",
        }
    }
}

impl fmt::Display for AccessDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    /// The role bypasses every check.
    GlobalBypass,
    /// The directory grants the action.
    ModulePermission,
    /// Access denied.
    Denied(AccessDenial),
}

/// Outcome of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    /// Whether access is granted.
    pub granted: bool,
    /// Why.
    pub source: DecisionSource,
}

impl AccessDecision {
    fn allow(source: DecisionSource) -> Self {
        Self {
            granted: true,
            source,
        }
    }

    fn deny(denial: AccessDenial) -> Self {
        Self {
            granted: false,
            source: DecisionSource::Denied(denial),
        }
    }

    /// The denial reason, if denied.
    pub fn denial(&self) -> Option<AccessDenial> {
        match self.source {
            DecisionSource::Denied(denial) => Some(denial),
            _ => None,
        }
    }
}

/// Decide `request` for `identity` against `snapshot`.
///
/// Pure and synchronous. `snapshot` must be the directory of the same slot
/// as `identity`; a snapshot loaded for another uuid counts as not loaded.
pub fn decide(
    request: &PermissionRequest,
    identity: &IdentitySlot,
    snapshot: &DirectorySnapshot,
    gating: ModuleGating,
) -> AccessDecision {
    let Some(user) = identity.user.as_ref() else {
        return AccessDecision::deny(AccessDenial::NoIdentity);
    };

    let role = identity.role.as_ref().unwrap_or(&user.role);
    if role.has_global_bypass() {
        return AccessDecision::allow(DecisionSource::GlobalBypass);
    }

    let decision = match snapshot.phase {
        _ if !identity.uuid().is_some_and(|uuid| snapshot.belongs_to(uuid)) => {
            AccessDecision::deny(AccessDenial::DirectoryNotLoaded)
        }
        FetchPhase::Idle | FetchPhase::Loading => {
            AccessDecision::deny(AccessDenial::DirectoryNotLoaded)
        }
        FetchPhase::Failed => AccessDecision::deny(AccessDenial::DirectoryFetchFailed),
        FetchPhase::Ready => {
            let directory = &snapshot.directory;
            if gating == ModuleGating::Enforced && !directory.role_allows(&request.module) {
                AccessDecision::deny(AccessDenial::RoleModuleExcluded)
            } else if !directory.permits(&request.module, &request.action) {
                AccessDecision::deny(AccessDenial::ActionNotGranted)
            } else {
                AccessDecision::allow(DecisionSource::ModulePermission)
            }
        }
    };

    debug!(
        module = %request.module,
        action = %request.action,
        role = %role,
        granted = decision.granted,
        "Access decided"
    );
    decision
}

/// Module-level check: role-module gating enforced.
pub fn can_access(
    request: &PermissionRequest,
    identity: &IdentitySlot,
    snapshot: &DirectorySnapshot,
) -> bool {
    decide(request, identity, snapshot, ModuleGating::Enforced).granted
}

/// Action-level check used inside pages: only the permission map counts.
pub fn can_perform(
    request: &PermissionRequest,
    identity: &IdentitySlot,
    snapshot: &DirectorySnapshot,
) -> bool {
    decide(request, identity, snapshot, ModuleGating::Skipped).granted
}
