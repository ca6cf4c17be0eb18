//! Root application state.
//!
//! [`AccessContext`] owns the session slots, the directory and menu caches,
//! the route table, and the guard. Every state change goes through one of
//! its methods; readers only ever see snapshots.

use std::sync::Arc;
use std::time::Duration;

use futures::future;
use serde::Serialize;
use tracing::{info, warn};

use portal_client::{
    AccessApi, AuthApi, Credentials, HttpClient, Notifier, ThrottledNotifier,
};
use portal_core::config::AppConfig;
use portal_core::result::AppResult;
use portal_entity::{PermissionRequest, SlotName, UserRecord};
use portal_store::StorageManager;

use crate::access::{AccessDecision, DirectoryCache, ModuleGating, decide};
use crate::guard::{GuardOutcome, GuardState, RouteGuard, private_gate, public_gate};
use crate::identity::{ActiveIdentity, IdentityView, resolve_identity};
use crate::nav::{MenuCache, VisibleNavigation, build_visible_tree};
use crate::routes::{RouteAccess, RouteTable};
use crate::session::{SessionStore, SlotPair};

/// Result of resolving a path.
#[derive(Debug, Clone, Serialize)]
pub struct RouteVerdict {
    /// The path asked about.
    pub path: String,
    /// Slot the path runs under.
    pub slot: SlotName,
    /// Matched route name.
    pub route: Option<String>,
    /// Guard state, for permission-protected routes that passed the gate.
    pub guard: Option<GuardState>,
    /// What to do.
    pub outcome: GuardOutcome,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    /// Slot the session was stored in.
    pub slot: SlotName,
    /// The signed-in user.
    pub user: UserRecord,
    /// Where to go next.
    pub redirect: String,
}

/// The portal's application state.
#[derive(Debug, Clone)]
pub struct AccessContext {
    config: Arc<AppConfig>,
    sessions: SessionStore,
    directories: DirectoryCache,
    menus: MenuCache,
    guard: RouteGuard,
    routes: Arc<RouteTable>,
    auth: Arc<dyn AuthApi>,
}

impl AccessContext {
    /// Assemble a context from its collaborators.
    pub fn new(
        config: AppConfig,
        sessions: SessionStore,
        access: Arc<dyn AccessApi>,
        auth: Arc<dyn AuthApi>,
    ) -> Self {
        let directories = DirectoryCache::new(Arc::clone(&access));
        let menus = MenuCache::new(access, &config.navigation);
        let guard = RouteGuard::new(directories.clone(), config.access.clone());
        let routes = Arc::new(RouteTable::dashboard(&config.access));

        Self {
            config: Arc::new(config),
            sessions,
            directories,
            menus,
            guard,
            routes,
            auth,
        }
    }

    /// Build the full stack from configuration: storage, sessions, and an
    /// HTTP client that authenticates with the session slots.
    pub async fn bootstrap(config: AppConfig, notifier: Arc<dyn Notifier>) -> AppResult<Self> {
        let storage = Arc::new(StorageManager::new(&config.storage).await?);
        let sessions = SessionStore::boot(storage).await?;
        let notifier = Arc::new(ThrottledNotifier::new(
            notifier,
            Duration::from_millis(config.notifications.dedup_window_ms),
        ));
        let http = Arc::new(HttpClient::new(
            &config.api,
            Arc::new(sessions.clone()),
            notifier,
        )?);

        info!(base_url = %http.base_url(), "Access context ready");
        Ok(Self::new(config, sessions, http.clone(), http))
    }

    /// Loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Session slots.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Directory cache.
    pub fn directories(&self) -> &DirectoryCache {
        &self.directories
    }

    /// Route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Slot that `path` runs under: the matching route's slot, or the
    /// path-prefix rule for unrouted paths.
    fn active<'a>(&self, path: &str, slots: &'a SlotPair) -> ActiveIdentity<'a> {
        match self.routes.resolve(path) {
            Some(found) => ActiveIdentity {
                slot_name: found.route.slot,
                slot: slots.get(found.route.slot),
                is_client: found.route.slot == SlotName::Client,
            },
            None => resolve_identity(path, slots),
        }
    }

    /// Normalized identity for `path`.
    pub async fn identity(&self, path: &str) -> IdentityView {
        let slots = self.sessions.slots().await;
        IdentityView::from(self.active(path, &slots))
    }

    /// Sign in against the backend and store the session.
    ///
    /// Signing in as a different user than the slot held drops that slot's
    /// directory and menu. A response without a token only refreshes the
    /// profile of an already signed-in slot.
    pub async fn login(&self, credentials: &Credentials) -> AppResult<LoginOutcome> {
        let payload = self.auth.login(credentials).await?;
        let slot = payload.user.role.slot();
        let previous = self.sessions.slot(slot).await;

        if payload.token.trim().is_empty() && previous.authenticated {
            self.sessions.refresh_profile(payload.user.clone()).await?;
        } else {
            self.sessions.login(payload.user.clone(), &payload.token).await?;
        }
        if previous.uuid() != Some(payload.user.uuid.trim()) {
            self.forget(slot).await;
        }

        Ok(LoginOutcome {
            slot,
            user: payload.user,
            redirect: slot.scoped(&self.config.access.dashboard_route),
        })
    }

    /// Sign `slot` out. The backend call is best-effort; the local session is
    /// always cleared.
    pub async fn logout(&self, slot: SlotName) -> AppResult<GuardOutcome> {
        if self.sessions.slot(slot).await.authenticated {
            if let Err(e) = self.auth.logout(slot).await {
                warn!(%slot, error = %e, "Backend logout failed; clearing local session anyway");
            }
        }
        self.sessions.logout(slot).await?;
        self.forget(slot).await;
        Ok(GuardOutcome::replace(slot.scoped(&self.config.access.login_route)))
    }

    async fn forget(&self, slot: SlotName) {
        self.directories.invalidate(slot);
        self.menus.invalidate(slot).await;
    }

    /// Decide what to do with `path` right now, without waiting for the
    /// directory.
    pub async fn authorize(&self, path: &str) -> RouteVerdict {
        self.route_verdict(path, false).await
    }

    /// Decide what to do with `path` once the directory has settled.
    pub async fn authorize_settled(&self, path: &str) -> RouteVerdict {
        self.route_verdict(path, true).await
    }

    async fn route_verdict(&self, path: &str, settle: bool) -> RouteVerdict {
        let found = self.routes.resolve(path);
        let slots = self.sessions.slots().await;
        let active = self.active(path, &slots);
        let (slot, identity) = (active.slot_name, active.slot);
        let access = &self.config.access;

        let (guard, outcome) = match &found {
            Some(found) if found.route.access == RouteAccess::Public => {
                (None, public_gate(slot, identity, access))
            }
            _ => match private_gate(slot, identity, access) {
                GuardOutcome::Render => match found
                    .as_ref()
                    .and_then(|f| f.route.permission.as_ref())
                {
                    Some(request) => {
                        let verdict = if settle {
                            self.guard.evaluate_settled(slot, identity, request).await
                        } else {
                            self.guard.evaluate(slot, identity, request)
                        };
                        (Some(verdict.state), verdict.outcome)
                    }
                    None => (None, GuardOutcome::Render),
                },
                redirect => (None, redirect),
            },
        };

        RouteVerdict {
            path: path.to_string(),
            slot,
            route: found.map(|f| f.route.name.clone()),
            guard,
            outcome,
        }
    }

    /// Decide `request` for `slot` once its directory has settled.
    pub async fn decide(
        &self,
        slot: SlotName,
        request: &PermissionRequest,
        gating: ModuleGating,
    ) -> AccessDecision {
        let identity = self.sessions.slot(slot).await;
        let snapshot = match identity.uuid() {
            Some(uuid) => self.directories.load(slot, uuid).await,
            None => self.directories.snapshot(slot),
        };
        decide(request, &identity, &snapshot, gating)
    }

    /// Side navigation for `path` as it stands now.
    pub async fn navigation(&self, path: &str) -> VisibleNavigation {
        self.visible_navigation(path, false).await
    }

    /// Side navigation for `path` once the directory has settled.
    pub async fn navigation_settled(&self, path: &str) -> VisibleNavigation {
        self.visible_navigation(path, true).await
    }

    async fn visible_navigation(&self, path: &str, settle: bool) -> VisibleNavigation {
        let slots = self.sessions.slots().await;
        let active = self.active(path, &slots);
        let (slot, identity) = (active.slot_name, active.slot);
        if !identity.authenticated {
            return VisibleNavigation::Tree { nodes: Vec::new() };
        }

        let directory = async {
            match identity.uuid() {
                Some(uuid) if settle => self.directories.load(slot, uuid).await,
                Some(uuid) => {
                    self.directories.ensure_loaded(slot, uuid);
                    self.directories.snapshot(slot)
                }
                None => self.directories.snapshot(slot),
            }
        };
        let (snapshot, menu) = future::join(directory, self.menus.get(slot)).await;

        build_visible_tree(
            &menu,
            identity,
            &snapshot,
            self.config.navigation.placeholder_rows,
        )
    }

    /// Cancel in-flight fetches; the context stops fetching afterwards.
    pub fn shutdown(&self) {
        self.directories.shutdown();
    }
}
