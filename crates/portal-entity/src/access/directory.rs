//! The access directory: per-module actions plus the role-module allow-list.

use std::collections::{HashMap, HashSet};

use serde::de::{Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Action, ModuleKey};

/// Wire shape of `GET user-permissions/{uuid}/module-access`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleAccessPayload {
    /// Module name to allowed action names.
    #[serde(default, deserialize_with = "permission_map")]
    pub permissions: HashMap<String, Vec<String>>,
    /// Modules the role may see at all.
    #[serde(default, rename = "roleModules")]
    pub role_modules: Vec<String>,
}

/// Accepts `null` and `[]` as an empty map; PHP backends encode an empty
/// associative array as a list.
fn permission_map<'de, D>(deserializer: D) -> Result<HashMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Map(HashMap<String, Vec<String>>),
        List(Vec<IgnoredAny>),
    }

    match Option::<Wire>::deserialize(deserializer)? {
        None => Ok(HashMap::new()),
        Some(Wire::Map(map)) => Ok(map),
        Some(Wire::List(list)) if list.is_empty() => Ok(HashMap::new()),
        Some(Wire::List(_)) => Err(D::Error::custom(
            "permissions must be an object of module name to actions",
        )),
    }
}

/// Normalized access data for one identity.
///
/// Module names are case-folded on the way in, so entries that differ only
/// in case are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessDirectory {
    permissions: HashMap<ModuleKey, HashSet<Action>>,
    role_modules: HashSet<ModuleKey>,
}

impl AccessDirectory {
    /// A directory that grants nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Grant `actions` on `module`.
    pub fn grant<I, A>(mut self, module: &str, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        self.permissions
            .entry(ModuleKey::new(module))
            .or_default()
            .extend(actions.into_iter().map(Into::into));
        self
    }

    /// Add `module` to the role-module allow-list.
    pub fn allow_module(mut self, module: &str) -> Self {
        self.role_modules.insert(ModuleKey::new(module));
        self
    }

    /// Whether the role may see `module` at all.
    pub fn role_allows(&self, module: &ModuleKey) -> bool {
        self.role_modules.contains(module)
    }

    /// Whether the per-user permission map grants `action` on `module`.
    pub fn permits(&self, module: &ModuleKey, action: &Action) -> bool {
        self.permissions
            .get(module)
            .is_some_and(|actions| actions.contains(action))
    }

    /// Actions granted on `module`, sorted.
    pub fn actions_for(&self, module: &ModuleKey) -> Vec<&Action> {
        let mut actions: Vec<&Action> = self
            .permissions
            .get(module)
            .map(|set| set.iter().collect())
            .unwrap_or_default();
        actions.sort();
        actions
    }

    /// Modules that have at least one permission entry, sorted.
    pub fn modules(&self) -> Vec<&ModuleKey> {
        let mut modules: Vec<&ModuleKey> = self.permissions.keys().collect();
        modules.sort();
        modules
    }

    /// Whether the directory grants nothing.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.role_modules.is_empty()
    }
}

impl From<ModuleAccessPayload> for AccessDirectory {
    fn from(payload: ModuleAccessPayload) -> Self {
        let mut directory = Self::empty();
        for (module, actions) in payload.permissions {
            directory = directory.grant(&module, actions.into_iter().map(Action::new));
        }
        for module in payload.role_modules {
            directory = directory.allow_module(&module);
        }
        directory
    }
}
