//! # Middleware chain: ordered handler decorators.
//!
//! A [`Middleware`] turns the next [`Handler`] into a new one. The
//! [`MiddlewareChain`] folds registered middleware around an inner handler so
//! that the **first registered is outermost** (onion ordering):
//!
//! ```text
//! chain = [m1, m2, m3]
//!
//! m1-before ─► m2-before ─► m3-before ─► inner(req)
//!                                           │
//! m1-after  ◄─ m2-after  ◄─ m3-after  ◄─────┘
//! ```
//!
//! The chain is composed once, when the service starts serving; requests then go
//! through the pre-built handler without any locking.
//!
//! Any `Fn(Handler) -> Handler + Send + Sync + 'static` closure is a middleware.
//!
//! # Example
//! ```rust
//! use httpvisor::{Handler, Middleware, MiddlewareChain, Request, Response};
//!
//! let add_header = |next: Handler| -> Handler {
//!     Handler::new(move |req: Request| {
//!         let next = next.clone();
//!         async move {
//!             let mut resp = next.call(req).await;
//!             resp.headers_mut().insert("x-served-by", "httpvisor".parse().unwrap());
//!             resp
//!         }
//!     })
//! };
//!
//! let chain = MiddlewareChain::new(vec![std::sync::Arc::new(add_header)]);
//! assert_eq!(chain.len(), 1);
//! ```

use std::sync::Arc;

use super::attributes;
use super::handler::{Handler, Request};

/// Handler decorator.
pub trait Middleware: Send + Sync + 'static {
    /// Wraps `next`, returning the decorated handler.
    fn wrap(&self, next: Handler) -> Handler;
}

impl<F> Middleware for F
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    fn wrap(&self, next: Handler) -> Handler {
        self(next)
    }
}

/// Ordered, immutable sequence of middleware.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    layers: Arc<[Arc<dyn Middleware>]>,
}

impl MiddlewareChain {
    /// Freezes the given middleware, in registration order.
    pub fn new(layers: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            layers: layers.into(),
        }
    }

    /// Folds the chain around `inner`; the first layer ends up outermost.
    pub fn compose(&self, inner: Handler) -> Handler {
        self.layers
            .iter()
            .rev()
            .fold(inner, |next, layer| layer.wrap(next))
    }

    /// Builds the externally exposed handler.
    ///
    /// - empty chain → `inner` itself (no per-request wrapper)
    /// - otherwise → attach a fresh [`attributes`] bag, then run the composed chain
    pub fn into_handler(&self, inner: Handler) -> Handler {
        if self.is_empty() {
            return inner;
        }
        let composed = self.compose(inner);
        Handler::new(move |req: Request| composed.call(attributes::init(req)))
    }

    /// True if no middleware is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of middleware.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;
    use axum::body::Body;
    use parking_lot::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn layer(tag: &'static str, log: &Log) -> Arc<dyn Middleware> {
        let log = Arc::clone(log);
        Arc::new(move |next: Handler| -> Handler {
            let log = Arc::clone(&log);
            Handler::new(move |req: Request| {
                let next = next.clone();
                let log = Arc::clone(&log);
                async move {
                    log.lock().push(format!("{tag}-before"));
                    let resp = next.call(req).await;
                    log.lock().push(format!("{tag}-after"));
                    resp
                }
            })
        })
    }

    fn inner(log: &Log) -> Handler {
        let log = Arc::clone(log);
        Handler::new(move |req: Request| {
            let log = Arc::clone(&log);
            async move {
                let bag = if attributes::get(&req).is_some() { "bag" } else { "plain" };
                log.lock().push(format!("inner-{bag}"));
                Response::new(Body::empty())
            }
        })
    }

    #[tokio::test]
    async fn first_registered_is_outermost() {
        let log: Log = Arc::default();
        let chain = MiddlewareChain::new(vec![
            layer("m1", &log),
            layer("m2", &log),
            layer("m3", &log),
        ]);

        chain
            .into_handler(inner(&log))
            .call(Request::new(Body::empty()))
            .await;

        assert_eq!(
            *log.lock(),
            vec![
                "m1-before",
                "m2-before",
                "m3-before",
                "inner-bag",
                "m3-after",
                "m2-after",
                "m1-after",
            ]
        );
    }

    #[tokio::test]
    async fn empty_chain_calls_inner_directly() {
        let log: Log = Arc::default();
        let chain = MiddlewareChain::default();
        assert!(chain.is_empty());

        chain
            .into_handler(inner(&log))
            .call(Request::new(Body::empty()))
            .await;

        assert_eq!(*log.lock(), vec!["inner-plain"]);
    }

    #[tokio::test]
    async fn middleware_can_short_circuit() {
        let log: Log = Arc::default();
        let deny: Arc<dyn Middleware> = Arc::new(|_next: Handler| -> Handler {
            Handler::new(|_req: Request| async {
                let mut resp = Response::new(Body::empty());
                *resp.status_mut() = axum::http::StatusCode::FORBIDDEN;
                resp
            })
        });
        let chain = MiddlewareChain::new(vec![layer("m1", &log), deny]);

        let resp = chain
            .into_handler(inner(&log))
            .call(Request::new(Body::empty()))
            .await;

        assert_eq!(resp.status(), axum::http::StatusCode::FORBIDDEN);
        assert_eq!(*log.lock(), vec!["m1-before", "m1-after"]);
    }
}
