//! # HTTP listener contract and the default axum implementation.
//!
//! The supervisor drives an [`HttpListener`] through two calls:
//! - `serve(handler)` blocks (asynchronously) until the listener terminates;
//! - `shutdown(deadline)` asks it to stop accepting and drain in-flight requests.
//!
//! `serve` returns `Ok(())` after a requested shutdown completed: that is a normal
//! termination, not a failure.
//!
//! [`AxumListener`] is the default implementation: `axum::serve` with graceful
//! shutdown driven by a [`CancellationToken`].
//!
//! ```text
//! shutdown(deadline) ─► token.cancel()
//!                          ├─► axum stops accepting, waits for open connections
//!                          └─► deadline (if any) elapses first ─► DeadlineExceeded
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use parking_lot::Mutex;
use tokio::{net::TcpListener, sync::watch};
use tokio_util::sync::CancellationToken;

use crate::error::ListenerError;

use super::handler::{Handler, Request};

/// Contract for the HTTP transport.
#[async_trait]
pub trait HttpListener: Send + Sync + 'static {
    /// Serves `handler` until shutdown completes or the listener fails.
    async fn serve(&self, handler: Handler) -> Result<(), ListenerError>;

    /// Requests graceful shutdown.
    ///
    /// Returns immediately; `serve` returns once in-flight requests are drained,
    /// or with [`ListenerError::DeadlineExceeded`] when `deadline` elapses first.
    fn shutdown(&self, deadline: Option<Duration>) -> Result<(), ListenerError>;
}

/// HTTP/1.1 listener backed by `axum::serve`.
pub struct AxumListener {
    address: SocketAddr,
    token: CancellationToken,
    deadline: Mutex<Option<Duration>>,
    bound: watch::Sender<Option<SocketAddr>>,
}

impl AxumListener {
    /// Creates a listener for `address`. Nothing is bound until `serve`.
    pub fn new(address: SocketAddr) -> Self {
        let (bound, _) = watch::channel(None);
        Self {
            address,
            token: CancellationToken::new(),
            deadline: Mutex::new(None),
            bound,
        }
    }

    /// The configured address.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// The bound address, once `serve` has bound the socket.
    ///
    /// Differs from [`AxumListener::address`] when port `0` was requested.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.bound.borrow()
    }

    /// Waits until `serve` has bound the socket and returns the bound address.
    pub async fn wait_bound(&self) -> Option<SocketAddr> {
        let mut rx = self.bound.subscribe();
        let addr = rx.wait_for(Option::is_some).await.ok().and_then(|a| *a);
        addr
    }

    /// Resolves once shutdown was requested and its deadline (if any) elapsed.
    async fn drain_deadline(&self) -> Duration {
        self.token.cancelled().await;
        let deadline = *self.deadline.lock();
        match deadline {
            Some(deadline) => {
                tokio::time::sleep(deadline).await;
                deadline
            }
            None => std::future::pending().await,
        }
    }
}

#[async_trait]
impl HttpListener for AxumListener {
    async fn serve(&self, handler: Handler) -> Result<(), ListenerError> {
        let tcp = TcpListener::bind(self.address)
            .await
            .map_err(|source| ListenerError::Bind {
                address: self.address.to_string(),
                source,
            })?;
        let local = tcp.local_addr()?;
        self.bound.send_replace(Some(local));
        tracing::info!(address = %local, "http listener bound");

        let router = Router::new().fallback(move |req: Request| {
            let handler = handler.clone();
            async move { handler.call(req).await }
        });

        let token = self.token.clone();
        let server = axum::serve(tcp, router)
            .with_graceful_shutdown(async move { token.cancelled().await })
            .into_future();

        tokio::select! {
            res = server => res.map_err(ListenerError::from),
            deadline = self.drain_deadline() => Err(ListenerError::DeadlineExceeded { deadline }),
        }
    }

    fn shutdown(&self, deadline: Option<Duration>) -> Result<(), ListenerError> {
        *self.deadline.lock() = deadline;
        self.token.cancel();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;
    use axum::body::Body;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn local() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    async fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(req.as_bytes()).await.unwrap();
        let mut buf = String::new();
        stream.read_to_string(&mut buf).await.unwrap();
        buf
    }

    #[tokio::test]
    async fn serves_until_shutdown() {
        let listener = Arc::new(AxumListener::new(local()));
        let handler = Handler::new(|req: Request| async move {
            Response::new(Body::from(format!("path={}", req.uri().path())))
        });

        let serving = tokio::spawn({
            let listener = Arc::clone(&listener);
            async move { listener.serve(handler).await }
        });

        let addr = listener.wait_bound().await.unwrap();
        assert_ne!(addr.port(), 0);
        assert_eq!(listener.local_addr(), Some(addr));

        let body = get(addr, "/ping").await;
        assert!(body.starts_with("HTTP/1.1 200"), "{body}");
        assert!(body.ends_with("path=/ping"), "{body}");

        listener.shutdown(None).unwrap();
        let res = tokio::time::timeout(Duration::from_secs(2), serving)
            .await
            .unwrap()
            .unwrap();
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn shutdown_before_serve_returns_promptly() {
        let listener = AxumListener::new(local());
        listener.shutdown(None).unwrap();
        let handler = Handler::new(|_req: Request| async { Response::new(Body::empty()) });

        let res = tokio::time::timeout(Duration::from_secs(2), listener.serve(handler))
            .await
            .unwrap();
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn deadline_bounds_the_drain() {
        let listener = Arc::new(AxumListener::new(local()));
        let handler = Handler::new(|_req: Request| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Response::new(Body::empty())
        });

        let serving = tokio::spawn({
            let listener = Arc::clone(&listener);
            async move { listener.serve(handler).await }
        });
        let addr = listener.wait_bound().await.unwrap();

        // A request that never completes in time keeps the drain open.
        let _client = tokio::spawn(async move { get(addr, "/slow").await });
        tokio::time::sleep(Duration::from_millis(100)).await;

        listener.shutdown(Some(Duration::from_millis(100))).unwrap();
        let res = tokio::time::timeout(Duration::from_secs(2), serving)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(res, Err(ListenerError::DeadlineExceeded { .. })));
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let taken = std::net::TcpListener::bind(local()).unwrap();
        let listener = AxumListener::new(taken.local_addr().unwrap());
        let handler = Handler::new(|_req: Request| async { Response::new(Body::empty()) });

        let res = listener.serve(handler).await;
        assert!(matches!(res, Err(ListenerError::Bind { .. })));
    }
}
