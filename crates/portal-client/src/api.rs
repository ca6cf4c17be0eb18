//! Traits for the backend calls the access layer makes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use portal_core::result::AppResult;
use portal_entity::{AccessDirectory, LoginPayload, ModuleTreeNode, SlotName};

/// Source of access directories and side menus.
///
/// `slot` is the identity context the request is made for; it selects the
/// bearer credential.
#[async_trait]
pub trait AccessApi: Send + Sync + std::fmt::Debug + 'static {
    /// `GET user-permissions/{uuid}/module-access`.
    async fn fetch_module_access(&self, slot: SlotName, uuid: &str) -> AppResult<AccessDirectory>;

    /// `GET user-permissions/side-menu`.
    async fn fetch_side_menu(&self, slot: SlotName) -> AppResult<Vec<ModuleTreeNode>>;
}

/// Login form data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account e-mail.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Session endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync + std::fmt::Debug + 'static {
    /// `POST login`.
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginPayload>;

    /// `POST logout` for the given slot.
    async fn logout(&self, slot: SlotName) -> AppResult<()>;
}
