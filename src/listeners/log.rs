//! # LogWriter: tracing-backed event logger
//!
//! A minimal listener that forwards every [`Event`] to [`tracing`], with a level
//! chosen by its kind. The crate never installs a tracing subscriber; the
//! embedding binary does.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO  httpvisor: pool-started seq=3
//! WARN  httpvisor: worker-error seq=9 reason="worker exited with status 255"
//! ERROR httpvisor: pool-failure seq=12 reason="relay closed"
//! INFO  httpvisor: pool-restarted seq=13
//! ```

use crate::events::{Event, EventKind};
use crate::listeners::Listen;

/// Event writer listener.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Listen for LogWriter {
    fn on_event(&self, e: &Event) {
        let label = e.kind.as_label();
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::PoolFailure | EventKind::PoolRestartFailed => {
                tracing::error!(seq = e.seq, reason, "{label}");
            }
            EventKind::WorkerError | EventKind::PoolError | EventKind::HttpError => {
                tracing::warn!(seq = e.seq, reason, "{label}");
            }
            EventKind::PoolStarted
            | EventKind::PoolStopped
            | EventKind::PoolRestarted
            | EventKind::ShutdownRequested => {
                tracing::info!(seq = e.seq, "{label}");
            }
            EventKind::WorkerConstructed | EventKind::WorkerDestructed => {
                tracing::debug!(seq = e.seq, reason, "{label}");
            }
            EventKind::HttpResponse => {
                tracing::trace!(seq = e.seq, reason, "{label}");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
