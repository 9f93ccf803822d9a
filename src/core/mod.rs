//! Runtime core: the service supervisor.
//!
//! The only public API from this module is [`Service`] (plus its builder and
//! status snapshot), which owns configuration, runtime handles and the
//! Init/Serve/Stop lifecycle.
//!
//! Internal modules:
//! - [`service`]: lifecycle, event routing and crash recovery;
//! - [`runtime`]: handles created by `serve` and the pool stop guard;
//! - [`builder`]: up-front registration of listeners and middleware;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod runtime;
mod service;
mod shutdown;

pub use builder::ServiceBuilder;
pub use service::{Service, ServiceStatus};
