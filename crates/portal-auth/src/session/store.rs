//! The two identity slots and their durable backing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use portal_client::TokenSource;
use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::traits::KeyValueStore;
use portal_entity::{IdentitySlot, Role, SlotName, UserRecord};
use portal_store::StorageManager;
use portal_store::keys;

/// Both identity slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotPair {
    admin: IdentitySlot,
    client: IdentitySlot,
}

impl SlotPair {
    /// The slot called `name`.
    pub fn get(&self, name: SlotName) -> &IdentitySlot {
        match name {
            SlotName::Admin => &self.admin,
            SlotName::Client => &self.client,
        }
    }

    /// Replace the slot called `name` as a whole.
    pub fn set(&mut self, name: SlotName, slot: IdentitySlot) {
        match name {
            SlotName::Admin => self.admin = slot,
            SlotName::Client => self.client = slot,
        }
    }
}

/// Process-wide session state.
///
/// Each mutation writes durable storage first and only then publishes the
/// new slot, under the write lock, so readers never observe a slot that is
/// not also on disk.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Durable credential storage.
    storage: Arc<StorageManager>,
    /// Published slots.
    slots: Arc<RwLock<SlotPair>>,
}

impl SessionStore {
    /// Populate both slots from durable storage.
    pub async fn boot(storage: Arc<StorageManager>) -> AppResult<Self> {
        let mut slots = SlotPair::default();
        for name in SlotName::ALL {
            let slot = read_slot(storage.as_ref(), name).await?;
            if slot.authenticated {
                info!(slot = %name, uuid = ?slot.uuid(), "Restored session");
            }
            slots.set(name, slot);
        }

        Ok(Self {
            storage,
            slots: Arc::new(RwLock::new(slots)),
        })
    }

    /// Snapshot of both slots.
    pub async fn slots(&self) -> SlotPair {
        self.slots.read().await.clone()
    }

    /// Snapshot of one slot.
    pub async fn slot(&self, name: SlotName) -> IdentitySlot {
        self.slots.read().await.get(name).clone()
    }

    /// Store a new session; the user's role picks the slot.
    ///
    /// The four storage keys are written as one batch. The other slot is
    /// left untouched.
    pub async fn login(&self, user: UserRecord, token: &str) -> AppResult<SlotName> {
        if token.trim().is_empty() {
            return Err(AppError::validation("Login requires a non-empty token"));
        }
        let name = user.role.slot();
        let user_json = serde_json::to_string(&user)?;
        let [user_key, token_key, role_key, auth_key] = keys::slot_keys(name);

        let mut slots = self.slots.write().await;
        self.storage
            .set_many(&[
                (user_key.as_str(), user_json.as_str()),
                (token_key.as_str(), token),
                (role_key.as_str(), user.role.as_str()),
                (auth_key.as_str(), "true"),
            ])
            .await?;

        info!(slot = %name, uuid = %user.uuid, role = %user.role, "Signed in");
        slots.set(name, IdentitySlot::signed_in(user, token));
        Ok(name)
    }

    /// Replace the stored user of an existing session, keeping its token.
    pub async fn refresh_profile(&self, user: UserRecord) -> AppResult<SlotName> {
        let name = user.role.slot();
        let user_json = serde_json::to_string(&user)?;

        let mut slots = self.slots.write().await;
        let token = slots.get(name).token.clone();
        self.storage
            .set_many(&[
                (keys::user(name).as_str(), user_json.as_str()),
                (keys::role(name).as_str(), user.role.as_str()),
            ])
            .await?;

        info!(slot = %name, uuid = %user.uuid, "Refreshed profile");
        slots.set(name, IdentitySlot::new(Some(user), token));
        Ok(name)
    }

    /// Clear one slot; the four storage keys are removed as one batch.
    pub async fn logout(&self, name: SlotName) -> AppResult<()> {
        let slot_keys = keys::slot_keys(name);
        let key_refs: Vec<&str> = slot_keys.iter().map(String::as_str).collect();

        let mut slots = self.slots.write().await;
        self.storage.remove_many(&key_refs).await?;

        info!(slot = %name, "Signed out");
        slots.set(name, IdentitySlot::empty());
        Ok(())
    }
}

#[async_trait]
impl TokenSource for SessionStore {
    async fn token_for(&self, slot: SlotName) -> Option<String> {
        self.slots.read().await.get(slot).token.clone()
    }
}

/// Read one slot's four keys.
async fn read_slot(storage: &StorageManager, name: SlotName) -> AppResult<IdentitySlot> {
    let slot_keys = keys::slot_keys(name);
    let key_refs: Vec<&str> = slot_keys.iter().map(String::as_str).collect();
    let mut values = storage.get_many(&key_refs).await?.into_iter();
    let raw_user = values.next().flatten();
    let token = values.next().flatten();
    let stored_role = values.next().flatten();

    let user = raw_user.and_then(|raw| match serde_json::from_str::<UserRecord>(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(slot = %name, error = %e, "Stored user record is unreadable; ignoring it");
            None
        }
    });

    let mut slot = IdentitySlot::new(user, token);
    if slot.role.is_none() {
        slot.role = stored_role.map(Role::from);
    }
    Ok(slot)
}
