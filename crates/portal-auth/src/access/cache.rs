//! Per-slot access directory cache with single-flight loading.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use portal_client::AccessApi;
use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_entity::{AccessDirectory, SlotName};

/// Fetch lifecycle of one slot's directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPhase {
    /// Nothing requested yet, or invalidated.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The directory was fetched.
    Ready,
    /// The fetch failed; the directory is empty.
    Failed,
}

/// Point-in-time view of one slot's directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectorySnapshot {
    /// Lifecycle phase.
    pub phase: FetchPhase,
    /// Identity the directory belongs to.
    pub uuid: Option<String>,
    /// Failure message when `phase` is `Failed`.
    pub error: Option<String>,
    /// The directory; empty unless `phase` is `Ready`.
    #[serde(skip)]
    pub directory: Arc<AccessDirectory>,
}

impl DirectorySnapshot {
    /// A fetch in flight for `uuid`.
    pub fn loading(uuid: impl Into<String>) -> Self {
        Self {
            phase: FetchPhase::Loading,
            uuid: Some(uuid.into()),
            ..Self::default()
        }
    }

    /// A fetched directory for `uuid`.
    pub fn ready(uuid: impl Into<String>, directory: AccessDirectory) -> Self {
        Self {
            phase: FetchPhase::Ready,
            uuid: Some(uuid.into()),
            error: None,
            directory: Arc::new(directory),
        }
    }

    /// A failed fetch for `uuid`.
    pub fn failed(uuid: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            phase: FetchPhase::Failed,
            uuid: Some(uuid.into()),
            error: Some(error.into()),
            directory: Arc::default(),
        }
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    /// Whether the fetch has completed, successfully or not.
    pub fn is_loaded(&self) -> bool {
        matches!(self.phase, FetchPhase::Ready | FetchPhase::Failed)
    }

    /// Whether the snapshot describes `uuid`.
    pub fn belongs_to(&self, uuid: &str) -> bool {
        self.uuid.as_deref() == Some(uuid)
    }
}

/// State kept per slot.
#[derive(Debug)]
struct SlotEntry {
    /// Generation of the most recent fetch; older results are dropped.
    generation: u64,
    /// Cancels the in-flight fetch.
    cancel: CancellationToken,
    /// Published snapshot.
    state: watch::Sender<DirectorySnapshot>,
}

impl SlotEntry {
    fn new() -> Self {
        let (state, _) = watch::channel(DirectorySnapshot::default());
        Self {
            generation: 0,
            cancel: CancellationToken::new(),
            state,
        }
    }
}

#[derive(Debug)]
struct Inner {
    api: Arc<dyn AccessApi>,
    entries: DashMap<SlotName, SlotEntry>,
    generations: AtomicU64,
    shutdown: CancellationToken,
}

/// Process-wide access directory cache, one entry per identity slot.
///
/// `ensure_loaded` starts at most one fetch per slot; further calls while
/// that fetch is in flight, or after it has completed for the same uuid,
/// do nothing. A completed entry only refreshes after `invalidate`, or when
/// a different uuid asks for the slot.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    inner: Arc<Inner>,
}

impl DirectoryCache {
    /// Create an empty cache fetching through `api`.
    pub fn new(api: Arc<dyn AccessApi>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                entries: DashMap::new(),
                generations: AtomicU64::new(0),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Start loading `slot`'s directory for `uuid` unless it is already
    /// loading or loaded for that uuid.
    ///
    /// Returns whether a fetch was started. Must be called from within a
    /// tokio runtime.
    pub fn ensure_loaded(&self, slot: SlotName, uuid: &str) -> bool {
        let uuid = uuid.trim();
        if uuid.is_empty() {
            return false;
        }
        if self.inner.shutdown.is_cancelled() {
            debug!(%slot, uuid, "Directory cache is shut down; not fetching");
            return false;
        }

        let mut entry = self.inner.entries.entry(slot).or_insert_with(SlotEntry::new);
        let current = entry.state.borrow().clone();
        if current.phase != FetchPhase::Idle && current.belongs_to(uuid) {
            return false;
        }

        // A different identity took over the slot.
        entry.cancel.cancel();

        let generation = self.inner.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = self.inner.shutdown.child_token();
        entry.generation = generation;
        entry.cancel = cancel.clone();
        entry.state.send_replace(DirectorySnapshot::loading(uuid));
        drop(entry);

        info!(%slot, uuid, generation, "Fetching access directory");
        let this = self.clone();
        let uuid = uuid.to_string();
        tokio::spawn(async move {
            this.run_fetch(slot, uuid, generation, cancel).await;
        });
        true
    }

    async fn run_fetch(
        &self,
        slot: SlotName,
        uuid: String,
        generation: u64,
        cancel: CancellationToken,
    ) {
        let result = self.fetch(slot, &uuid, &cancel).await;
        if let Err(e) = &result {
            if e.kind == ErrorKind::Cancelled {
                debug!(%slot, uuid = %uuid, generation, "{}", e.message);
                return;
            }
        }

        let Some(entry) = self.inner.entries.get(&slot) else {
            return;
        };
        if entry.generation != generation {
            debug!(%slot, uuid = %uuid, generation, "Discarding superseded directory");
            return;
        }

        let snapshot = match result {
            Ok(directory) => {
                info!(
                    %slot,
                    uuid = %uuid,
                    modules = directory.modules().len(),
                    "Access directory loaded"
                );
                DirectorySnapshot::ready(uuid, directory)
            }
            Err(e) => {
                if e.is_remote() {
                    warn!(%slot, uuid = %uuid, error = %e, "Access directory fetch failed");
                } else {
                    error!(%slot, uuid = %uuid, error = %e, "Access directory fetch failed");
                }
                DirectorySnapshot::failed(uuid, e.message)
            }
        };
        entry.state.send_replace(snapshot);
    }

    /// Fetch through the api unless `cancel` fires first.
    async fn fetch(
        &self,
        slot: SlotName,
        uuid: &str,
        cancel: &CancellationToken,
    ) -> AppResult<AccessDirectory> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AppError::cancelled("Directory fetch cancelled")),
            result = self.inner.api.fetch_module_access(slot, uuid) => result,
        }
    }

    /// Current state of `slot`.
    pub fn snapshot(&self, slot: SlotName) -> DirectorySnapshot {
        self.inner
            .entries
            .get(&slot)
            .map(|entry| entry.state.borrow().clone())
            .unwrap_or_default()
    }

    /// Watch `slot` for changes.
    pub fn subscribe(&self, slot: SlotName) -> watch::Receiver<DirectorySnapshot> {
        self.inner
            .entries
            .entry(slot)
            .or_insert_with(SlotEntry::new)
            .state
            .subscribe()
    }

    /// Ensure `slot` is loading for `uuid` and wait until the fetch settles.
    ///
    /// Returns early with the current snapshot if the slot is invalidated
    /// while waiting.
    pub async fn load(&self, slot: SlotName, uuid: &str) -> DirectorySnapshot {
        self.ensure_loaded(slot, uuid);
        let mut rx = self.subscribe(slot);
        match rx.wait_for(|s| s.phase != FetchPhase::Loading).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(slot),
        }
    }

    /// Forget `slot`'s directory and cancel its in-flight fetch.
    pub fn invalidate(&self, slot: SlotName) {
        if let Some(mut entry) = self.inner.entries.get_mut(&slot) {
            entry.cancel.cancel();
            entry.generation = self.inner.generations.fetch_add(1, Ordering::Relaxed) + 1;
            entry.state.send_replace(DirectorySnapshot::default());
            info!(%slot, "Access directory invalidated");
        }
    }

    /// Cancel every in-flight fetch and refuse new ones.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        for mut entry in self.inner.entries.iter_mut() {
            if entry.state.borrow().is_loading() {
                entry.state.send_replace(DirectorySnapshot::default());
            }
            entry.generation = self.inner.generations.fetch_add(1, Ordering::Relaxed) + 1;
        }
        info!("Directory cache shut down");
    }
}
