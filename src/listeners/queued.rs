//! # QueuedListener: async subscriber behind a bounded queue
//!
//! [`QueuedListener`] adapts a slow, asynchronous [`Subscribe`] implementation to
//! the synchronous [`Listen`] contract. Each event is pushed into a bounded queue
//! and processed by a dedicated worker task, so the delivering thread never waits.
//!
//! ## What it guarantees
//! - `on_event(&Event)` returns immediately.
//! - FIFO order for this subscriber.
//! - Panics inside the subscriber are caught and logged (isolation).
//!
//! ## What it does **not** guarantee
//! - No retries on queue overflow (the event is dropped for this subscriber).
//!
//! ```text
//!   on_event(&Event) ──try_send──► [bounded queue] ──► worker ──► sub.on_event().await
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::Event;

use super::Listen;

/// Contract for asynchronous event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations may be slow
/// (I/O, batching) without affecting the publisher or other listeners.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    ///
    /// On overflow, events for this subscriber are **dropped** (warn).
    fn queue_capacity(&self) -> usize {
        1024
    }
}

/// Listener that forwards events to a [`Subscribe`] worker task.
pub struct QueuedListener {
    name: &'static str,
    sender: Mutex<Option<mpsc::Sender<Arc<Event>>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl QueuedListener {
    /// Spawns the worker task for `sub`.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn(sub: Arc<dyn Subscribe>) -> Self {
        let cap = sub.queue_capacity().max(1);
        let name = sub.name();
        let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);

        let worker = tokio::spawn(async move {
            while let Some(ev) = rx.recv().await {
                let fut = sub.on_event(ev.as_ref());
                if let Err(panic) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                    tracing::error!(
                        subscriber = sub.name(),
                        panic = ?panic,
                        "subscriber panicked"
                    );
                }
            }
        });

        Self {
            name,
            sender: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Closes the queue and waits until the worker has processed what was queued.
    ///
    /// Events delivered afterwards are dropped.
    pub async fn drain(&self) {
        drop(self.sender.lock().take());
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            let _ = worker.await;
        }
    }
}

impl Listen for QueuedListener {
    fn on_event(&self, event: &Event) {
        let guard = self.sender.lock();
        let Some(sender) = guard.as_ref() else {
            tracing::warn!(subscriber = self.name, "subscriber dropped event: worker closed");
            return;
        };
        match sender.try_send(Arc::new(event.clone())) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(subscriber = self.name, "subscriber dropped event: queue full");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(subscriber = self.name, "subscriber dropped event: worker closed");
            }
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
