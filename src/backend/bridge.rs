//! # Bridging handler contract.

use async_trait::async_trait;

use crate::events::EventSink;
use crate::http::{Request, Response};

/// Translates HTTP requests into worker requests and back.
///
/// The bridge is created per `serve` run, bound to the configuration and the
/// pool handle. It reports per-request outcomes
/// ([`HttpResponse`](crate::EventKind::HttpResponse),
/// [`HttpError`](crate::EventKind::HttpError)) through the sink.
#[async_trait]
pub trait Bridge: Send + Sync + 'static {
    /// Routes bridge events to `sink`.
    fn listen(&self, sink: EventSink);

    /// Handles one request.
    ///
    /// Failures are rendered into the response (e.g. `500`), not returned.
    async fn handle(&self, req: Request) -> Response;
}
