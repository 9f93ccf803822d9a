//! # Runtime handles of one `serve` run.
//!
//! Created exactly once, inside `Service::serve`, under the control lock; read
//! without locking afterwards.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::backend::WorkerPool;
use crate::http::{Handler, HttpListener};

/// Handles owned by a running service.
pub(crate) struct Runtime {
    /// Worker pool handle (also restarted by crash recovery).
    pub pool: Arc<dyn WorkerPool>,
    /// HTTP transport.
    pub listener: Arc<dyn HttpListener>,
    /// Externally exposed handler: the bridge, or the middleware chain around it.
    pub handler: Handler,
}

/// Stops the pool when dropped.
///
/// Armed right after the pool started, so the pool is stopped once the listener
/// returns, whatever its outcome, and also if the `serve` future is dropped.
/// `serving` is cleared first: crash recovery must not restart a pool that is
/// being stopped for good.
pub(crate) struct PoolGuard<'a> {
    pool: Arc<dyn WorkerPool>,
    serving: &'a AtomicBool,
}

impl<'a> PoolGuard<'a> {
    pub fn new(pool: Arc<dyn WorkerPool>, serving: &'a AtomicBool) -> Self {
        Self { pool, serving }
    }
}

impl Drop for PoolGuard<'_> {
    fn drop(&mut self) {
        self.serving.store(false, Ordering::SeqCst);
        self.pool.stop();
        tracing::debug!("worker pool stopped");
    }
}
