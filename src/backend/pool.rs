//! # Worker pool contract.

use crate::error::PoolError;
use crate::events::EventSink;

/// Handle to an external worker-pool engine.
///
/// Process spawning, the worker wire protocol and request marshaling all live
/// behind this trait.
///
/// ### Rules
/// - `listen` is called once, before `start`.
/// - `start` may be called again after a [`PoolFailure`](crate::EventKind::PoolFailure)
///   event, from the thread that delivered it, but only while the service is serving.
///   It must not block on event delivery.
/// - `stop` is called once the HTTP listener returned. A restart racing with that
///   stop is stopped again, so `stop` must tolerate repeated calls.
pub trait WorkerPool: Send + Sync + 'static {
    /// Routes pool and worker events to `sink`.
    fn listen(&self, sink: EventSink);

    /// Starts (or restarts) the workers.
    fn start(&self) -> Result<(), PoolError>;

    /// Stops all workers.
    fn stop(&self);
}
