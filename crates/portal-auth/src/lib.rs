//! # portal-auth
//!
//! Access-control resolution for the admin/client portal.
//!
//! ## Modules
//!
//! - `identity`: picks the active identity slot from a URL path
//! - `session`: the two durable identity slots, login and logout
//! - `access`: access directory cache and the decision procedure
//! - `guard`: route guard state machine, private/public gates
//! - `routes`: route table with explicit slot ownership
//! - `nav`: side-menu cache and visible navigation tree
//! - `context`: the root state tying everything together

pub mod access;
pub mod context;
pub mod guard;
pub mod identity;
pub mod nav;
pub mod routes;
pub mod session;

pub use access::{
    AccessDecision, AccessDenial, DecisionSource, DirectoryCache, DirectorySnapshot, FetchPhase,
    ModuleGating, can_access, can_perform, decide,
};
pub use context::{AccessContext, LoginOutcome, RouteVerdict};
pub use guard::{GuardOutcome, GuardState, GuardVerdict, RouteGuard, private_gate, public_gate};
pub use identity::{ActiveIdentity, IdentityView, is_client_path, resolve_identity};
pub use nav::{MenuCache, VisibleNavigation, build_visible_tree};
pub use routes::{RouteAccess, RouteDef, RouteMatch, RouteTable};
pub use session::{SessionStore, SlotPair};
