//! User records and roles.

pub mod model;
pub mod role;

pub use model::{LoginPayload, UserRecord};
pub use role::Role;
