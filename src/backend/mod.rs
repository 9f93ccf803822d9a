//! External collaborators the supervisor drives.
//!
//! The worker-pool engine, the bridging handler and the HTTP transport are black
//! boxes: the service only creates them through a [`Backend`], wires them to its
//! event sink, and starts/stops them.
//!
//! ```text
//! Backend::new_pool(&spec)             ─► Arc<dyn WorkerPool>
//! Backend::new_bridge(&cfg, pool)      ─► Arc<dyn Bridge>
//! Backend::new_listener(addr)          ─► Arc<dyn HttpListener>   (default: AxumListener)
//! ```

mod bridge;
mod pool;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::{PoolSpec, ServiceConfig};
use crate::http::{AxumListener, HttpListener};

pub use bridge::Bridge;
pub use pool::WorkerPool;

/// Factory for the runtime handles of one `serve` run.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use httpvisor::{
///     Backend, Bridge, EventSink, PoolError, PoolSpec, Request, Response, ServiceConfig,
///     WorkerPool,
/// };
///
/// struct NoPool;
///
/// impl WorkerPool for NoPool {
///     fn listen(&self, _sink: EventSink) {}
///     fn start(&self) -> Result<(), PoolError> { Ok(()) }
///     fn stop(&self) {}
/// }
///
/// struct Echo;
///
/// #[async_trait]
/// impl Bridge for Echo {
///     fn listen(&self, _sink: EventSink) {}
///     async fn handle(&self, req: Request) -> Response {
///         Response::new(req.into_body())
///     }
/// }
///
/// struct EchoBackend;
///
/// impl Backend for EchoBackend {
///     fn new_pool(&self, _spec: &PoolSpec) -> Arc<dyn WorkerPool> {
///         Arc::new(NoPool)
///     }
///     fn new_bridge(&self, _cfg: &ServiceConfig, _pool: Arc<dyn WorkerPool>) -> Arc<dyn Bridge> {
///         Arc::new(Echo)
///     }
/// }
/// ```
pub trait Backend: Send + Sync + 'static {
    /// Creates a pool handle sized from `spec`. The pool is not started yet.
    fn new_pool(&self, spec: &PoolSpec) -> Arc<dyn WorkerPool>;

    /// Creates the bridging handler bound to `cfg` and `pool`.
    fn new_bridge(&self, cfg: &ServiceConfig, pool: Arc<dyn WorkerPool>) -> Arc<dyn Bridge>;

    /// Creates the HTTP listener for `address`.
    fn new_listener(&self, address: SocketAddr) -> Arc<dyn HttpListener> {
        Arc::new(AxumListener::new(address))
    }
}
