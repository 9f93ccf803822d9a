//! # httpvisor
//!
//! **httpvisor** supervises an HTTP service that proxies inbound requests to a
//! pool of long-lived worker processes.
//!
//! It owns the service lifecycle (init/serve/stop), the request-handling
//! composition (middleware chain), event routing, and the crash-recovery
//! policy. The worker-pool engine, the request bridge and the HTTP transport
//! are collaborators it drives through traits.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                         ┌────────────────────────────┐
//!   ServiceConfig ──────► │  Service (supervisor)      │ ◄── stop() (any thread,
//!   RpcRegistry (opt) ◄── │  - control lock            │      RPC, signals,
//!                         │  - stopping flag (atomic)  │      crash recovery)
//!                         │  - EventBus (listeners)    │
//!                         │  - MiddlewareChain         │
//!                         │  - RestartPolicy           │
//!                         └──────┬──────────┬──────────┘
//!                    Backend     │          │
//!              ┌─────────────────┘          └─────────────┐
//!              ▼                                          ▼
//!     ┌────────────────┐      ┌────────────────┐    ┌──────────────┐
//!     │  WorkerPool    │ ◄─── │    Bridge      │ ◄──│ HttpListener │ ◄── HTTP
//!     │ (processes)    │      │ (HTTP ⇄ worker)│    │ (axum)       │
//!     └───────┬────────┘      └───────┬────────┘    └──────────────┘
//!             │ events                │ events
//!             └──────────► EventSink ◄┘
//!                              │
//!                              ▼
//!                  EventBus::emit ─► L1, L2, … LN (in order)
//!                              │
//!                              └─► PoolFailure? ─► RestartPolicy ─► restart / stop
//! ```
//!
//! ### Lifecycle
//! ```text
//! init(cfg) ─► Ok(false)  disabled: nothing else happens
//!           └► Ok(true)   configured
//!
//! serve():
//!   ├─► build pool, bridge, listener; wire both to the event sink
//!   ├─► exposed handler = bridge            (no middleware)
//!   │                   = m1(m2(…(bridge))) (middleware, fresh attributes per request)
//!   ├─► pool.start()  ── Err ─► return PoolStart (listener never started)
//!   ├─► listener.serve(handler)   … blocks until shutdown …
//!   └─► pool.stop() (always, once the listener returned)
//!
//! stop():  first call ─► listener.shutdown(deadline); later calls are no-ops
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                         |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Supervision**   | Init/serve/stop lifecycle, runtime handles, status.          | [`Service`], [`ServiceBuilder`]            |
//! | **Listeners**     | Observe pool, worker, HTTP and supervisor events.            | [`Listen`], [`Subscribe`], [`LogWriter`]   |
//! | **Middleware**    | Onion-ordered request decorators, per-request attributes.    | [`Middleware`], [`Attributes`]             |
//! | **Recovery**      | Named policy for fatal pool failures.                        | [`RestartPolicy`], [`Recovery`]            |
//! | **Collaborators** | Pool engine, bridge and HTTP transport behind traits.        | [`Backend`], [`WorkerPool`], [`Bridge`]    |
//! | **Errors**        | Typed errors for configuration, startup and transport.       | [`ServiceError`], [`ConfigError`]          |
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use httpvisor::{
//!     Backend, Bridge, EventSink, LogWriter, PoolError, PoolSpec, Request, Response,
//!     Service, ServiceConfig, WorkerPool,
//! };
//!
//! # struct Pool;
//! # impl WorkerPool for Pool {
//! #     fn listen(&self, _sink: EventSink) {}
//! #     fn start(&self) -> Result<(), PoolError> { Ok(()) }
//! #     fn stop(&self) {}
//! # }
//! # struct Echo;
//! # #[async_trait]
//! # impl Bridge for Echo {
//! #     fn listen(&self, _sink: EventSink) {}
//! #     async fn handle(&self, req: Request) -> Response { Response::new(req.into_body()) }
//! # }
//! struct Workers;
//!
//! impl Backend for Workers {
//!     fn new_pool(&self, _spec: &PoolSpec) -> Arc<dyn WorkerPool> { Arc::new(Pool) }
//!     fn new_bridge(&self, _cfg: &ServiceConfig, _pool: Arc<dyn WorkerPool>) -> Arc<dyn Bridge> {
//!         Arc::new(Echo)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = ServiceConfig::default();
//!     cfg.enabled = true;
//!     cfg.address = ":8080".into();
//!     cfg.workers.command = "php worker.php".into();
//!
//!     let service = Service::builder(Workers).with_listener(LogWriter).build();
//!     if !service.init(cfg, None)? {
//!         return Ok(());
//!     }
//!     service.serve_until_signal().await?;
//!     Ok(())
//! }
//! ```

mod backend;
mod config;
mod core;
mod error;
mod events;
mod listeners;
mod policies;
mod rpc;

pub mod http;

// ---- Public re-exports ----

pub use backend::{Backend, Bridge, WorkerPool};
pub use config::{PoolSpec, ServiceConfig};
pub use crate::core::{Service, ServiceBuilder, ServiceStatus};
pub use error::{ConfigError, ListenerError, PoolError, ServiceError};
pub use events::{Event, EventBus, EventKind, EventSink};
pub use http::{
    Attributes, AxumListener, BoxResponse, Handler, HttpListener, Middleware, MiddlewareChain,
    Request, Response, attributes,
};
pub use listeners::{Listen, LogWriter, QueuedListener, Subscribe};
pub use policies::{Recovery, RestartPolicy};
pub use rpc::{RpcRegistry, SERVICE_ID, ServiceRpc};
