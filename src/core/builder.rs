use std::sync::Arc;

use crate::backend::Backend;
use crate::http::Middleware;
use crate::listeners::Listen;

use super::service::Service;

/// Builder for constructing a [`Service`] with listeners and middleware
/// registered up front.
pub struct ServiceBuilder {
    backend: Arc<dyn Backend>,
    listeners: Vec<Arc<dyn Listen>>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl ServiceBuilder {
    /// Creates a new builder for the given backend.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            listeners: Vec::new(),
            middleware: Vec::new(),
        }
    }

    /// Appends an event listener.
    pub fn with_listener(mut self, listener: impl Listen) -> Self {
        self.listeners.push(Arc::new(listener));
        self
    }

    /// Appends listeners, in order.
    pub fn with_listeners(mut self, listeners: Vec<Arc<dyn Listen>>) -> Self {
        self.listeners.extend(listeners);
        self
    }

    /// Appends a middleware; the first one added is the outermost.
    pub fn with_middleware(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Builds the service. It still needs `init` before `serve`.
    pub fn build(self) -> Arc<Service> {
        Service::from_parts(self.backend, self.listeners, self.middleware)
    }
}
