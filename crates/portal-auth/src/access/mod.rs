//! Access directories and the decision procedure.
//!
//! The cache owns the fetch lifecycle; `decision` is a pure function over a
//! snapshot of it.

pub mod cache;
pub mod decision;

pub use cache::{DirectoryCache, DirectorySnapshot, FetchPhase};
pub use decision::{
    AccessDecision, AccessDenial, DecisionSource, ModuleGating, can_access, can_perform, decide,
};
