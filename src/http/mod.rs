//! HTTP side of the service: handlers, middleware, attributes and the listener.
//!
//! ## Contents
//! - [`Handler`] type-erased request handler ([`Request`] → [`Response`])
//! - [`Middleware`], [`MiddlewareChain`] onion-ordered handler decorators
//! - [`attributes`] per-request metadata bag attached on the middleware path
//! - [`HttpListener`], [`AxumListener`] transport contract and default implementation
//!
//! ## Request path
//! ```text
//! AxumListener ──► exposed Handler
//!                    ├─ no middleware: Handler::from_bridge(bridge)      (direct)
//!                    └─ middleware:    attributes::init ─► m1 ─► … ─► mN ─► bridge
//! ```

pub mod attributes;
mod handler;
mod listener;
mod middleware;

pub use attributes::Attributes;
pub use handler::{BoxResponse, Handler, Request, Response};
pub use listener::{AxumListener, HttpListener};
pub use middleware::{Middleware, MiddlewareChain};
