//! Module permissions and role-module allow-lists.

pub mod action;
pub mod directory;
pub mod key;
pub mod request;

pub use action::Action;
pub use directory::{AccessDirectory, ModuleAccessPayload};
pub use key::ModuleKey;
pub use request::PermissionRequest;
