//! Route guard state machine.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use portal_core::config::AccessConfig;
use portal_entity::{IdentitySlot, PermissionRequest, SlotName};

use crate::access::{
    AccessDenial, DecisionSource, DirectoryCache, DirectorySnapshot, ModuleGating, decide,
};

/// Where a guarded view stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    /// Waiting for identity or directory.
    Loading,
    /// Bypass role; rendered unconditionally.
    Bypassed,
    /// Directory fetch failed; sent to the error route.
    DeniedFetchFailed,
    /// Role may not see the module; sent to the forbidden route.
    DeniedNoRoleModule,
    /// Action not granted; sent to the forbidden route.
    DeniedNoPermission,
    /// Rendered.
    Allowed,
}

impl GuardState {
    /// Return the state as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Bypassed => "bypassed",
            Self::DeniedFetchFailed => "denied_fetch_failed",
            Self::DeniedNoRoleModule => "denied_no_role_module",
            Self::DeniedNoPermission => "denied_no_permission",
            Self::Allowed => "allowed",
        }
    }
}

impl fmt::Display for GuardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the host should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardOutcome {
    /// Render the view.
    Render,
    /// Render a non-interactive placeholder.
    Placeholder,
    /// Navigate elsewhere.
    Redirect {
        /// Target path.
        to: String,
        /// Replace the current history entry instead of pushing.
        replace: bool,
    },
}

impl GuardOutcome {
    /// A history-replacing redirect.
    pub fn replace(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            replace: true,
        }
    }
}

/// Guard state plus the action it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardVerdict {
    /// State reached.
    pub state: GuardState,
    /// What to do about it.
    pub outcome: GuardOutcome,
}

/// Guards views protected by a `(module, action)` request.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    directories: DirectoryCache,
    config: AccessConfig,
}

impl RouteGuard {
    /// Create a guard over `directories`.
    pub fn new(directories: DirectoryCache, config: AccessConfig) -> Self {
        Self {
            directories,
            config,
        }
    }

    /// Evaluate the guard for the current state.
    ///
    /// Entering the guard starts the directory fetch for the identity if
    /// needed; repeated evaluation never issues a second fetch. With no
    /// identity the guard waits: redirecting signed-out users is the
    /// private gate's job.
    pub fn evaluate(
        &self,
        slot: SlotName,
        identity: &IdentitySlot,
        request: &PermissionRequest,
    ) -> GuardVerdict {
        if let Some(uuid) = identity.uuid() {
            self.directories.ensure_loaded(slot, uuid);
        }
        let snapshot = self.directories.snapshot(slot);
        self.verdict(slot, identity, request, &snapshot)
    }

    /// Evaluate once the directory fetch for the identity has settled.
    pub async fn evaluate_settled(
        &self,
        slot: SlotName,
        identity: &IdentitySlot,
        request: &PermissionRequest,
    ) -> GuardVerdict {
        let snapshot = match identity.uuid() {
            Some(uuid) => self.directories.load(slot, uuid).await,
            None => self.directories.snapshot(slot),
        };
        self.verdict(slot, identity, request, &snapshot)
    }

    /// Map a decision to a guard state.
    pub fn verdict(
        &self,
        slot: SlotName,
        identity: &IdentitySlot,
        request: &PermissionRequest,
        snapshot: &DirectorySnapshot,
    ) -> GuardVerdict {
        let decision = decide(request, identity, snapshot, ModuleGating::Enforced);
        let verdict = match decision.source {
            DecisionSource::GlobalBypass => GuardVerdict {
                state: GuardState::Bypassed,
                outcome: GuardOutcome::Render,
            },
            DecisionSource::ModulePermission => GuardVerdict {
                state: GuardState::Allowed,
                outcome: GuardOutcome::Render,
            },
            DecisionSource::Denied(AccessDenial::NoIdentity | AccessDenial::DirectoryNotLoaded) => {
                GuardVerdict {
                    state: GuardState::Loading,
                    outcome: GuardOutcome::Placeholder,
                }
            }
            DecisionSource::Denied(AccessDenial::DirectoryFetchFailed) => GuardVerdict {
                state: GuardState::DeniedFetchFailed,
                outcome: GuardOutcome::replace(slot.scoped(&self.config.error_route)),
            },
            DecisionSource::Denied(AccessDenial::RoleModuleExcluded) => GuardVerdict {
                state: GuardState::DeniedNoRoleModule,
                outcome: GuardOutcome::replace(slot.scoped(&self.config.forbidden_route)),
            },
            DecisionSource::Denied(AccessDenial::ActionNotGranted) => GuardVerdict {
                state: GuardState::DeniedNoPermission,
                outcome: GuardOutcome::replace(slot.scoped(&self.config.forbidden_route)),
            },
        };

        debug!(%slot, request = %request, state = %verdict.state, "Route guard evaluated");
        verdict
    }
}
