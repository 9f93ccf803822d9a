//! # Runtime events emitted by the worker pool, the bridge and the supervisor.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Pool events**: worker and pool lifecycle reported by the pool engine
//! - **HTTP events**: per-request outcomes reported by the bridging handler
//! - **Supervisor events**: shutdown and recovery decisions taken by `Service`
//!
//! The [`Event`] struct carries a timestamp, a human-readable reason and an
//! opaque context payload supplied by the publisher.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use httpvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::WorkerError)
//!     .with_reason("worker exited with status 255")
//!     .with_context(4242_u32);
//!
//! assert_eq!(ev.kind, EventKind::WorkerError);
//! assert_eq!(ev.reason.as_deref(), Some("worker exited with status 255"));
//! assert_eq!(ev.context::<u32>(), Some(&4242));
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Pool events ===
    /// A worker process was spawned.
    WorkerConstructed,

    /// A worker process was destroyed (recycled, killed or exited).
    WorkerDestructed,

    /// A worker reported an error (stderr output, bad payload, non-zero exit).
    WorkerError,

    /// The pool hit a recoverable error (e.g. allocation timeout).
    PoolError,

    /// The pool finished starting its workers.
    PoolStarted,

    /// The pool stopped all of its workers.
    PoolStopped,

    /// The pool can no longer serve requests.
    ///
    /// This is the only fatal kind: it triggers the [`RestartPolicy`](crate::RestartPolicy).
    PoolFailure,

    // === HTTP events ===
    /// The bridge produced a response.
    HttpResponse,

    /// The bridge failed to produce a response.
    HttpError,

    // === Supervisor events ===
    /// `stop` initiated listener shutdown.
    ShutdownRequested,

    /// The pool was restarted after a failure.
    PoolRestarted,

    /// Restarting the pool failed; the service is being stopped.
    ///
    /// Sets:
    /// - `reason`: the start error
    PoolRestartFailed,
}

impl EventKind {
    /// True for kinds that trigger crash recovery.
    #[inline]
    pub fn is_fatal(self) -> bool {
        matches!(self, EventKind::PoolFailure)
    }

    /// Returns a short stable label (kebab-case) for use in logs.
    pub fn as_label(self) -> &'static str {
        match self {
            EventKind::WorkerConstructed => "worker-constructed",
            EventKind::WorkerDestructed => "worker-destructed",
            EventKind::WorkerError => "worker-error",
            EventKind::PoolError => "pool-error",
            EventKind::PoolStarted => "pool-started",
            EventKind::PoolStopped => "pool-stopped",
            EventKind::PoolFailure => "pool-failure",
            EventKind::HttpResponse => "http-response",
            EventKind::HttpError => "http-error",
            EventKind::ShutdownRequested => "shutdown-requested",
            EventKind::PoolRestarted => "pool-restarted",
            EventKind::PoolRestartFailed => "pool-restart-failed",
        }
    }
}

/// Runtime event.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - `reason`: optional human-readable detail
/// - `context`: optional opaque payload, see [`Event::context`]
#[derive(Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Human-readable reason (errors, exit statuses, etc.).
    pub reason: Option<Arc<str>>,

    payload: Option<Arc<dyn Any + Send + Sync>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            reason: None,
            payload: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an opaque payload.
    #[inline]
    pub fn with_context<T: Any + Send + Sync>(mut self, context: T) -> Self {
        self.payload = Some(Arc::new(context));
        self
    }

    /// Returns the payload if it was attached with type `T`.
    pub fn context<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref()?.downcast_ref::<T>()
    }

    /// True if a payload is attached.
    #[inline]
    pub fn has_context(&self) -> bool {
        self.payload.is_some()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("seq", &self.seq)
            .field("kind", &self.kind)
            .field("reason", &self.reason)
            .field("context", &self.payload.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::PoolStarted);
        let b = Event::new(EventKind::PoolStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn context_downcasts_by_type() {
        let ev = Event::new(EventKind::HttpResponse).with_context(String::from("GET /"));
        assert_eq!(ev.context::<String>().map(String::as_str), Some("GET /"));
        assert!(ev.context::<u64>().is_none());
        assert!(Event::new(EventKind::PoolStarted).context::<String>().is_none());
    }

    #[test]
    fn only_pool_failure_is_fatal() {
        assert!(EventKind::PoolFailure.is_fatal());
        assert!(!EventKind::PoolError.is_fatal());
        assert!(!EventKind::WorkerError.is_fatal());
        assert!(!EventKind::PoolRestartFailed.is_fatal());
    }
}
