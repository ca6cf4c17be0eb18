//! # portal-entity
//!
//! Value types shared by the portal crates. Every struct here is a plain
//! data carrier deriving `Debug`, `Clone`, `Serialize`, and `Deserialize`
//! in the shape the backend sends it.

pub mod access;
pub mod envelope;
pub mod identity;
pub mod module;
pub mod user;

pub use access::{AccessDirectory, Action, ModuleAccessPayload, ModuleKey, PermissionRequest};
pub use envelope::ApiResponse;
pub use identity::{IdentitySlot, SlotName};
pub use module::{ModuleTreeNode, NodeId};
pub use user::{LoginPayload, Role, UserRecord};
