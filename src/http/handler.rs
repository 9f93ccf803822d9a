//! # Request handlers.
//!
//! [`Handler`] is the type-erased request → response function that flows
//! through the service: the bridge is wrapped into one, middleware decorates
//! one into another, and the HTTP listener serves one.
//!
//! A handler is cheap to clone (internally holds an `Arc`).

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::backend::Bridge;

/// Inbound HTTP request.
pub type Request = axum::extract::Request;

/// Outbound HTTP response.
pub type Response = axum::response::Response;

/// Boxed response future returned by [`Handler::call`].
pub type BoxResponse = BoxFuture<'static, Response>;

/// Type-erased, cloneable request handler.
#[derive(Clone)]
pub struct Handler {
    f: Arc<dyn Fn(Request) -> BoxResponse + Send + Sync>,
}

impl Handler {
    /// Creates a handler from an async function.
    ///
    /// # Example
    /// ```rust
    /// use httpvisor::{Handler, Request, Response};
    ///
    /// let hello = Handler::new(|_req: Request| async { Response::new("hello".into()) });
    /// # let _ = hello;
    /// ```
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self {
            f: Arc::new(move |req: Request| -> BoxResponse { Box::pin(f(req)) }),
        }
    }

    /// Wraps a bridging handler; the request is handed to it unchanged.
    pub fn from_bridge(bridge: Arc<dyn Bridge>) -> Self {
        Self::new(move |req| {
            let bridge = Arc::clone(&bridge);
            async move { bridge.handle(req).await }
        })
    }

    /// Invokes the handler.
    #[inline]
    pub fn call(&self, req: Request) -> BoxResponse {
        (self.f)(req)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler")
    }
}
