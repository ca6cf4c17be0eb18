//! Per-slot side-menu cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, warn};

use portal_client::AccessApi;
use portal_core::config::NavigationConfig;
use portal_entity::{ModuleTreeNode, SlotName};

/// Caches the raw side menu of each slot.
///
/// Concurrent lookups for the same slot share one fetch. Failures are not
/// cached; the caller gets an empty menu and the next lookup retries.
#[derive(Debug, Clone)]
pub struct MenuCache {
    api: Arc<dyn AccessApi>,
    cache: Cache<SlotName, Arc<Vec<ModuleTreeNode>>>,
}

impl MenuCache {
    /// Create a cache from configuration.
    pub fn new(api: Arc<dyn AccessApi>, config: &NavigationConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.menu_capacity)
            .time_to_live(Duration::from_secs(config.menu_ttl_seconds))
            .build();
        Self { api, cache }
    }

    /// The raw menu of `slot`, fetched on first use.
    pub async fn get(&self, slot: SlotName) -> Arc<Vec<ModuleTreeNode>> {
        let api = Arc::clone(&self.api);
        let fetched = self
            .cache
            .try_get_with(slot, async move {
                debug!(%slot, "Loading side menu");
                api.fetch_side_menu(slot).await.map(Arc::new)
            })
            .await;

        match fetched {
            Ok(menu) => menu,
            Err(e) => {
                warn!(%slot, error = %e, "Side menu unavailable");
                Arc::default()
            }
        }
    }

    /// Drop the cached menu of `slot`.
    pub async fn invalidate(&self, slot: SlotName) {
        self.cache.invalidate(&slot).await;
        debug!(%slot, "Side menu invalidated");
    }
}
