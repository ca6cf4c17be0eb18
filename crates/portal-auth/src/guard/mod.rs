//! Route guarding.

pub mod gate;
pub mod route;

pub use gate::{private_gate, public_gate};
pub use route::{GuardOutcome, GuardState, GuardVerdict, RouteGuard};
