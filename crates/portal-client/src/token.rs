//! Bearer credential sources.

use std::collections::HashMap;

use async_trait::async_trait;

use portal_entity::SlotName;

/// Supplies the bearer credential for requests made in a slot's context.
#[async_trait]
pub trait TokenSource: Send + Sync + std::fmt::Debug + 'static {
    /// The credential held by `slot`, if any.
    async fn token_for(&self, slot: SlotName) -> Option<String>;
}

/// Fixed credentials (for testing and one-shot tools).
#[derive(Debug, Clone, Default)]
pub struct StaticTokens {
    tokens: HashMap<SlotName, String>,
}

impl StaticTokens {
    /// No credentials at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the credential for a slot.
    pub fn with(mut self, slot: SlotName, token: impl Into<String>) -> Self {
        self.tokens.insert(slot, token.into());
        self
    }
}

#[async_trait]
impl TokenSource for StaticTokens {
    async fn token_for(&self, slot: SlotName) -> Option<String> {
        self.tokens.get(&slot).cloned()
    }
}
