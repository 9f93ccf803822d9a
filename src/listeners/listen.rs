//! # Core listener trait
//!
//! `Listen` is the extension point for observing runtime events. Listeners are
//! called **synchronously** on the thread that delivered the event (a pool
//! thread, a request task, or the caller of `stop`), in registration order.
//!
//! ## Contract
//! - Implementations must be fast and must not block.
//! - A panic is caught by the [`EventBus`](crate::EventBus), logged, and does not
//!   prevent delivery to the remaining listeners.
//! - Slow observers should implement [`Subscribe`](crate::Subscribe) and be wrapped
//!   in a [`QueuedListener`](crate::QueuedListener).
//!
//! Any `Fn(&Event) + Send + Sync + 'static` closure is a listener.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use httpvisor::{Event, EventKind, Listen};
//!
//! let failures = Arc::new(AtomicUsize::new(0));
//! let counter = {
//!     let failures = Arc::clone(&failures);
//!     move |ev: &Event| {
//!         if ev.kind == EventKind::PoolFailure {
//!             failures.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//! };
//!
//! counter.on_event(&Event::new(EventKind::PoolFailure));
//! assert_eq!(failures.load(Ordering::Relaxed), 1);
//! ```

use crate::events::Event;

/// Contract for synchronous event listeners.
pub trait Listen: Send + Sync + 'static {
    /// Handle a single event.
    fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> Listen for F
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event) {
        self(event)
    }
}
