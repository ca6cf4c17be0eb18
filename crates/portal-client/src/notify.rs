//! User-visible notices for transport failures.
//!
//! The HTTP client reports 401/403/5xx and network failures here. Notices
//! never change identity or directory state; they are purely informative.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, error};

/// Fallback text for HTTP 401 without a server message.
pub const UNAUTHORIZED: &str = "Unauthorized. Please login again.";
/// Text for HTTP 403.
pub const FORBIDDEN: &str = "Forbidden. No access rights.";
/// Text for HTTP 5xx.
pub const SERVER_ERROR: &str = "Server error. Try again later.";
/// Text when no response arrived.
pub const NETWORK_ERROR: &str = "Network error. Check your connection.";

/// A transient, user-visible error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Message text.
    pub message: String,
    /// HTTP status that caused it, if a response arrived.
    pub status: Option<u16>,
}

impl Notice {
    /// Build a notice.
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }
}

/// Sink for notices.
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Show a notice.
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        error!(status = ?notice.status, "{}", notice.message);
    }
}

/// Fans notices out to subscribers, e.g. a UI toast layer.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Notice>,
}

impl BroadcastNotifier {
    /// Create a notifier with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to future notices.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notice: Notice) {
        // No subscribers is fine; the notice is simply dropped.
        let _ = self.sender.send(notice);
    }
}

/// Keeps every notice in memory (for testing).
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl MemoryNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

/// Shows at most one notice per window; the rest are only logged.
///
/// The window starts when a notice is shown, so a burst of failures yields
/// a single notice.
#[derive(Debug)]
pub struct ThrottledNotifier {
    inner: Arc<dyn Notifier>,
    window: Duration,
    last_shown: Mutex<Option<Instant>>,
}

impl ThrottledNotifier {
    /// Wrap `inner` with a de-duplication window.
    pub fn new(inner: Arc<dyn Notifier>, window: Duration) -> Self {
        Self {
            inner,
            window,
            last_shown: Mutex::new(None),
        }
    }
}

impl Notifier for ThrottledNotifier {
    fn notify(&self, notice: Notice) {
        let now = Instant::now();
        {
            let mut last = self
                .last_shown
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match *last {
                Some(shown) if now.duration_since(shown) < self.window => {
                    debug!(message = %notice.message, "Suppressed duplicate notice");
                    return;
                }
                _ => *last = Some(now),
            }
        }
        self.inner.notify(notice);
    }
}
