//! Error types used by the httpvisor supervisor and its collaborators.
//!
//! - [`ConfigError`]: malformed configuration, surfaced by `Service::init`.
//! - [`PoolError`]: raised by a [`WorkerPool`](crate::WorkerPool) when it cannot start.
//! - [`ListenerError`]: raised by an [`HttpListener`](crate::HttpListener) serve loop.
//! - [`ServiceError`]: everything `Service` itself returns.
//!
//! Each enum provides `as_label` for logs and metrics.

use std::time::Duration;
use thiserror::Error;

/// # Configuration errors.
///
/// Returned synchronously from `Service::init`; a service that fails here never
/// reaches `serve`.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No listen address was configured.
    #[error("http address is not set")]
    EmptyAddress,

    /// The address could not be resolved into a socket address.
    #[error("invalid http address {address:?}")]
    InvalidAddress {
        /// The configured address.
        address: String,
    },

    /// The worker command is empty.
    #[error("worker command is not set")]
    EmptyCommand,

    /// The relay is neither `pipes` nor a `tcp://` / `unix://` address.
    #[error("invalid worker relay {relay:?}")]
    InvalidRelay {
        /// The configured relay.
        relay: String,
    },

    /// The pool was configured with zero workers.
    #[error("pool.num_workers must be set")]
    NoWorkers,

    /// A pool timeout was configured as zero.
    #[error("pool.{field} must be set")]
    ZeroTimeout {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::EmptyAddress => "config_empty_address",
            ConfigError::InvalidAddress { .. } => "config_invalid_address",
            ConfigError::EmptyCommand => "config_empty_command",
            ConfigError::InvalidRelay { .. } => "config_invalid_relay",
            ConfigError::NoWorkers => "config_no_workers",
            ConfigError::ZeroTimeout { .. } => "config_zero_timeout",
        }
    }
}

/// # Worker pool errors.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PoolError {
    /// The pool refused to start.
    #[error("pool failed to start: {reason}")]
    Start {
        /// Human-readable cause reported by the pool engine.
        reason: String,
    },

    /// Spawning or talking to worker processes failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PoolError {
    /// Convenience constructor for [`PoolError::Start`].
    pub fn start(reason: impl Into<String>) -> Self {
        PoolError::Start {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            PoolError::Start { .. } => "pool_start",
            PoolError::Io(_) => "pool_io",
        }
    }
}

/// # HTTP listener errors.
///
/// A graceful shutdown is **not** an error: serve loops return `Ok(())` for it.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ListenerError {
    /// Binding the listen socket failed.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address the listener tried to bind.
        address: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The serve loop terminated with an I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// In-flight requests did not drain before the shutdown deadline.
    #[error("shutdown deadline {deadline:?} exceeded")]
    DeadlineExceeded {
        /// Deadline passed to `shutdown`.
        deadline: Duration,
    },
}

impl ListenerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Bind { .. } => "listener_bind",
            ListenerError::Io(_) => "listener_io",
            ListenerError::DeadlineExceeded { .. } => "listener_deadline_exceeded",
        }
    }
}

/// # Errors produced by the service supervisor.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration was rejected by validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// `init` was called again after an enabled configuration was stored.
    #[error("service is already configured")]
    AlreadyConfigured,

    /// `serve` was called without a successful, enabled `init`.
    #[error("service is not configured")]
    NotConfigured,

    /// `serve` was called on a service that has already been started.
    #[error("service has already been started")]
    AlreadyStarted,

    /// A listener or middleware was registered after `serve` began.
    #[error("registration is closed once the service is started")]
    RegistrationClosed,

    /// The worker pool did not start; the HTTP listener was never started.
    #[error(transparent)]
    PoolStart(PoolError),

    /// The HTTP listener terminated abnormally.
    #[error("http listener: {0}")]
    Listener(#[from] ListenerError),
}

impl ServiceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use httpvisor::ServiceError;
    ///
    /// assert_eq!(ServiceError::AlreadyStarted.as_label(), "service_already_started");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::Config(e) => e.as_label(),
            ServiceError::AlreadyConfigured => "service_already_configured",
            ServiceError::NotConfigured => "service_not_configured",
            ServiceError::AlreadyStarted => "service_already_started",
            ServiceError::RegistrationClosed => "service_registration_closed",
            ServiceError::PoolStart(e) => e.as_label(),
            ServiceError::Listener(e) => e.as_label(),
        }
    }
}
