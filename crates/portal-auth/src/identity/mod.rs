//! Active identity resolution.

pub mod resolver;

pub use resolver::{ActiveIdentity, IdentityView, is_client_path, resolve_identity};
