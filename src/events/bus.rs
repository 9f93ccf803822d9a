//! # Event bus: synchronous fan-out to registered listeners.
//!
//! [`EventBus`] delivers each event to every listener in registration order, on
//! the calling thread. The listener set is frozen when the bus is built (the
//! service builds it once, when `serve` begins), so delivery takes no lock.
//!
//! ## Architecture
//! ```text
//! Publishers:                                   Listeners (frozen, ordered):
//!   WorkerPool ──┐                               ┌──► L1.on_event()
//!                ├──► EventSink ──► Service ──► EventBus ──► L2.on_event()
//!   Bridge     ──┘                    │          └──► LN.on_event()
//!                                     └──► RestartPolicy (fatal kinds only)
//! ```
//!
//! ## Rules
//! - **Ordered**: listeners are called in the order they were registered.
//! - **Isolated**: a panicking listener is logged and skipped; the rest still run.
//! - **Non-retroactive**: listeners only see events emitted after the bus was built.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::listeners::Listen;

use super::event::Event;

/// Ordered, immutable set of listeners.
///
/// Cheap to clone (internally holds an `Arc`-backed slice).
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<[Arc<dyn Listen>]>,
}

impl EventBus {
    /// Freezes the given listeners into a bus.
    pub fn new(listeners: Vec<Arc<dyn Listen>>) -> Self {
        Self {
            listeners: listeners.into(),
        }
    }

    /// Delivers `ev` to every listener, in registration order.
    pub fn emit(&self, ev: &Event) {
        for listener in self.listeners.iter() {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener.on_event(ev))) {
                tracing::error!(
                    listener = listener.name(),
                    event = ev.kind.as_label(),
                    panic = ?panic,
                    "listener panicked"
                );
            }
        }
    }

    /// True if there are no listeners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Number of listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use parking_lot::Mutex;

    fn recorder(tag: &'static str, log: &Arc<Mutex<Vec<(u64, &'static str)>>>) -> Arc<dyn Listen> {
        let log = Arc::clone(log);
        Arc::new(move |ev: &Event| log.lock().push((ev.seq, tag)))
    }

    #[test]
    fn delivers_every_event_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let bus = EventBus::new(vec![
            recorder("a", &log),
            recorder("b", &log),
            recorder("c", &log),
        ]);

        let first = Event::new(EventKind::PoolStarted);
        let second = Event::new(EventKind::WorkerError);
        bus.emit(&first);
        bus.emit(&second);

        assert_eq!(
            *log.lock(),
            vec![
                (first.seq, "a"),
                (first.seq, "b"),
                (first.seq, "c"),
                (second.seq, "a"),
                (second.seq, "b"),
                (second.seq, "c"),
            ]
        );
    }

    #[test]
    fn panicking_listener_does_not_break_fan_out() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let bad: Arc<dyn Listen> = Arc::new(|ev: &Event| {
            if ev.kind == EventKind::PoolFailure {
                panic!("listener bug");
            }
        });
        let bus = EventBus::new(vec![recorder("a", &log), bad, recorder("c", &log)]);

        let ev = Event::new(EventKind::PoolFailure);
        bus.emit(&ev);

        assert_eq!(*log.lock(), vec![(ev.seq, "a"), (ev.seq, "c")]);
    }

    #[test]
    fn empty_bus_is_a_no_op() {
        let bus = EventBus::default();
        assert!(bus.is_empty());
        bus.emit(&Event::new(EventKind::PoolStarted));
    }
}
