//! # Service configuration.
//!
//! [`ServiceConfig`] is the immutable snapshot handed to `Service::init`. It is
//! validated once and stored write-once; the supervisor never mutates it.
//!
//! [`PoolSpec`] describes the worker pool. The supervisor does not interpret it
//! beyond validation: it is handed as-is to [`Backend::new_pool`](crate::Backend::new_pool).
//!
//! ## Sentinel values
//! - `address = ":8080"` → listen on all interfaces, port 8080 (`":0"` = ephemeral port)
//! - `workers.max_jobs = 0` → workers are never recycled
//! - `shutdown_timeout = None` → graceful shutdown waits for every in-flight request
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use httpvisor::{RestartPolicy, ServiceConfig};
//!
//! let mut cfg = ServiceConfig::default();
//! cfg.enabled = true;
//! cfg.address = ":8080".into();
//! cfg.workers.command = "php worker.php".into();
//! cfg.restart = RestartPolicy::WhileRunning;
//! cfg.shutdown_timeout = Some(Duration::from_secs(10));
//!
//! assert!(cfg.validate().is_ok());
//! assert_eq!(cfg.socket_addr().unwrap().port(), 8080);
//! ```

use std::net::{SocketAddr, ToSocketAddrs};
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::error::ConfigError;
use crate::policies::RestartPolicy;

/// Configuration of the HTTP service.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// When `false`, `init` reports the service as disabled and nothing else happens.
    pub enabled: bool,

    /// Listen address, `host:port` or `:port`.
    pub address: String,

    /// Worker pool settings, forwarded to the pool engine.
    pub workers: PoolSpec,

    /// What to do when the pool reports a fatal failure.
    pub restart: RestartPolicy,

    /// Upper bound for draining in-flight requests on `stop`.
    ///
    /// `None` waits without limit.
    pub shutdown_timeout: Option<Duration>,
}

impl ServiceConfig {
    /// Checks the configuration for obvious mistakes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        self.workers.validate()
    }

    /// Resolves [`ServiceConfig::address`] into a socket address.
    ///
    /// A leading `:` means "all interfaces".
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = self.address.trim();
        if address.is_empty() {
            return Err(ConfigError::EmptyAddress);
        }

        let invalid = || ConfigError::InvalidAddress {
            address: self.address.clone(),
        };

        let normalized = match address.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => address.to_owned(),
        };

        if let Ok(addr) = normalized.parse::<SocketAddr>() {
            return Ok(addr);
        }
        normalized
            .to_socket_addrs()
            .map_err(|_| invalid())?
            .next()
            .ok_or_else(invalid)
    }
}

impl Default for ServiceConfig {
    /// Default configuration:
    ///
    /// - `enabled = false`
    /// - `address = "127.0.0.1:8080"`
    /// - `workers = PoolSpec::default()`
    /// - `restart = RestartPolicy::WhileRunning`
    /// - `shutdown_timeout = None` (unbounded drain)
    fn default() -> Self {
        Self {
            enabled: false,
            address: "127.0.0.1:8080".to_owned(),
            workers: PoolSpec::default(),
            restart: RestartPolicy::default(),
            shutdown_timeout: None,
        }
    }
}

/// Worker pool settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolSpec {
    /// Command used to spawn a worker process.
    pub command: String,

    /// How the pool talks to workers: `pipes`, `tcp://host:port` or `unix://path`.
    pub relay: String,

    /// Number of worker processes.
    pub num_workers: usize,

    /// Requests a worker serves before it is replaced (`0` = unlimited).
    pub max_jobs: u64,

    /// How long a request may wait for a free worker.
    pub allocate_timeout: Duration,

    /// How long a worker gets to exit before it is killed.
    pub destroy_timeout: Duration,
}

impl PoolSpec {
    /// Checks the pool settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command.trim().is_empty() {
            return Err(ConfigError::EmptyCommand);
        }

        let relay = self.relay.as_str();
        let relay_ok = relay == "pipes"
            || relay.strip_prefix("tcp://").is_some_and(|a| !a.is_empty())
            || relay.strip_prefix("unix://").is_some_and(|a| !a.is_empty());
        if !relay_ok {
            return Err(ConfigError::InvalidRelay {
                relay: self.relay.clone(),
            });
        }

        if self.num_workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.allocate_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout {
                field: "allocate_timeout",
            });
        }
        if self.destroy_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout {
                field: "destroy_timeout",
            });
        }
        Ok(())
    }

    /// Returns the recycle limit as an `Option`.
    ///
    /// - `None` → workers are never recycled
    /// - `Some(n)` → a worker is replaced after `n` requests
    #[inline]
    pub fn jobs_limit(&self) -> Option<u64> {
        (self.max_jobs != 0).then_some(self.max_jobs)
    }
}

impl Default for PoolSpec {
    /// Default pool:
    ///
    /// - `command = ""` (must be set)
    /// - `relay = "pipes"`
    /// - `num_workers` = available parallelism
    /// - `max_jobs = 0` (unlimited)
    /// - `allocate_timeout = 60s`
    /// - `destroy_timeout = 30s`
    fn default() -> Self {
        Self {
            command: String::new(),
            relay: "pipes".to_owned(),
            num_workers: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            max_jobs: 0,
            allocate_timeout: Duration::from_secs(60),
            destroy_timeout: Duration::from_secs(30),
        }
    }
}
