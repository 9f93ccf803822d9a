//! # RPC registration hook.
//!
//! When `Service::init` receives an [`RpcRegistry`], it registers a
//! [`ServiceRpc`] endpoint under [`SERVICE_ID`] so an external operator can
//! reach the running service. The transport and the remote method set belong
//! to the registry; the endpoint only exposes native operations.
//!
//! The endpoint holds the service weakly: registering does not keep a dropped
//! service alive.

use std::sync::{Arc, Weak};

use crate::core::{Service, ServiceStatus};

/// Well-known name the service registers under.
pub const SERVICE_ID: &str = "http";

/// External control channel the service can register with.
pub trait RpcRegistry {
    /// Registers `endpoint` under `name`.
    fn register(&self, name: &str, endpoint: ServiceRpc);
}

/// Control endpoint for one [`Service`].
#[derive(Clone)]
pub struct ServiceRpc {
    service: Weak<Service>,
}

impl ServiceRpc {
    pub(crate) fn new(service: &Arc<Service>) -> Self {
        Self {
            service: Arc::downgrade(service),
        }
    }

    /// Current status, or `None` if the service was dropped.
    pub fn status(&self) -> Option<ServiceStatus> {
        self.service.upgrade().map(|service| service.status())
    }

    /// Requests graceful shutdown. Returns `false` if the service was dropped.
    pub fn stop(&self) -> bool {
        match self.service.upgrade() {
            Some(service) => {
                service.stop();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for ServiceRpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRpc")
            .field("alive", &(self.service.strong_count() > 0))
            .finish()
    }
}
