//! # EventSink: the single entry point for runtime events.
//!
//! The supervisor hands one [`EventSink`] to both the worker pool and the
//! bridging handler, so every event they publish funnels through one path:
//! fan-out to listeners, then crash-recovery evaluation.
//!
//! ```text
//! WorkerPool::listen(sink.clone())
//! Bridge::listen(sink)
//!     sink.emit(Event::new(EventKind::PoolFailure)) ─► Service::on_event
//! ```

use std::fmt;
use std::sync::Arc;

use super::event::Event;

/// Cloneable handle that delivers events to the supervisor.
#[derive(Clone)]
pub struct EventSink {
    deliver: Arc<dyn Fn(Event) + Send + Sync>,
}

impl EventSink {
    /// Wraps a delivery function.
    pub fn new<F>(deliver: F) -> Self
    where
        F: Fn(Event) + Send + Sync + 'static,
    {
        Self {
            deliver: Arc::new(deliver),
        }
    }

    /// A sink that drops every event.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Delivers one event, synchronously.
    #[inline]
    pub fn emit(&self, ev: Event) {
        (self.deliver)(ev)
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventSink")
    }
}
