//! # Service: supervises one HTTP listener and one worker pool.
//!
//! The [`Service`] owns the configuration, the registered listeners and
//! middleware, and (while running) the pool, bridge and listener handles. It
//! routes every pool/bridge event through one path and applies the
//! [`RestartPolicy`](crate::RestartPolicy) to fatal pool failures.
//!
//! ## Lifecycle
//! ```text
//! Service::new ─► init(cfg) ─┬─ Ok(false): disabled, nothing else happens
//!                            └─ Ok(true):  configured
//!                                  │
//!                                  ▼
//!                               serve() ─────────────────────────────► returns
//!                                  │  (under control lock)                 ▲
//!                                  │  seal listeners/middleware            │
//!                                  │  pool = new_pool(spec)                │
//!                                  │  bridge = new_bridge(cfg, pool)       │
//!                                  │  listener = new_listener(addr)        │
//!                                  │  pool.listen(sink), bridge.listen(sink)
//!                                  │  handler = bridge | chain(bridge)     │
//!                                  ▼                                       │
//!                               pool.start() ── Err ─► PoolStart ──────────┤
//!                                  │ Ok: serving = true                    │
//!                               listener.serve(handler) ── returns ─► serving = false,
//!                                                                     pool.stop()
//!                                  ▲
//!                     stop() ──────┘ listener.shutdown(deadline)
//! ```
//!
//! ## Event routing
//! ```text
//! pool / bridge ─► EventSink ─► Service::on_event(ev)
//!                                 ├─► EventBus::emit(&ev)          (listeners, in order)
//!                                 └─► if ev.kind.is_fatal() && serving:
//!                                        restart.decide(stopping)
//!                                          ├─ Restart  ─► pool.start() ─ Err ─► stop()
//!                                          ├─ Escalate ─► stop()
//!                                          └─ Ignore
//! ```
//!
//! ## Concurrency
//! - `init`/`serve`/`stop` serialize on a single control lock. `serve` claims the
//!   service and builds its handles in one critical section, so a `stop` that
//!   observes `started` always finds the listener.
//! - Runtime handles are written once, inside `serve`, and read lock-free afterwards.
//! - Crash recovery only runs while `serving`: between a successful `pool.start()`
//!   and the pool stop that follows the listener's return.
//! - The `stopping` flag is monotonic (false → true) and gives `stop` and the
//!   restart policy a lock-free fast path.
//! - Requests never touch the lock: the exposed handler is composed once.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parking_lot::Mutex;

use crate::backend::Backend;
use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::events::{Event, EventBus, EventKind, EventSink};
use crate::http::{Handler, Middleware, MiddlewareChain};
use crate::listeners::Listen;
use crate::policies::Recovery;
use crate::rpc::{RpcRegistry, SERVICE_ID, ServiceRpc};

use super::builder::ServiceBuilder;
use super::runtime::{PoolGuard, Runtime};
use super::shutdown;

/// Listeners and middleware collected before `serve`.
#[derive(Default)]
struct Registration {
    listeners: Vec<Arc<dyn Listen>>,
    middleware: Vec<Arc<dyn Middleware>>,
    sealed: bool,
}

impl Registration {
    /// Closes registration and hands out what was collected.
    fn seal(&mut self) -> (Vec<Arc<dyn Listen>>, Vec<Arc<dyn Middleware>>) {
        self.sealed = true;
        (
            std::mem::take(&mut self.listeners),
            std::mem::take(&mut self.middleware),
        )
    }
}

/// Point-in-time view of a service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceStatus {
    /// `init` stored an enabled configuration.
    pub enabled: bool,
    /// Configured listen address, if enabled.
    pub address: Option<String>,
    /// `serve` has been called.
    pub started: bool,
    /// `stop` issued a listener shutdown.
    pub stopping: bool,
}

/// Configuration stored by `init`, with the listen address already resolved.
struct Settings {
    cfg: ServiceConfig,
    address: SocketAddr,
}

/// HTTP service supervisor.
pub struct Service {
    backend: Arc<dyn Backend>,
    settings: OnceLock<Settings>,
    registration: Mutex<Registration>,

    /// Serializes runtime creation and shutdown initiation.
    control: Mutex<()>,
    runtime: OnceLock<Arc<Runtime>>,
    bus: OnceLock<EventBus>,

    started: AtomicBool,
    serving: AtomicBool,
    stopping: AtomicBool,
}

impl Service {
    /// Creates an unconfigured service.
    pub fn new(backend: impl Backend) -> Arc<Self> {
        Self::from_parts(Arc::new(backend), Vec::new(), Vec::new())
    }

    /// Returns a builder for registering listeners and middleware up front.
    pub fn builder(backend: impl Backend) -> ServiceBuilder {
        ServiceBuilder::new(Arc::new(backend))
    }

    pub(crate) fn from_parts(
        backend: Arc<dyn Backend>,
        listeners: Vec<Arc<dyn Listen>>,
        middleware: Vec<Arc<dyn Middleware>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            backend,
            settings: OnceLock::new(),
            registration: Mutex::new(Registration {
                listeners,
                middleware,
                sealed: false,
            }),
            control: Mutex::new(()),
            runtime: OnceLock::new(),
            bus: OnceLock::new(),
            started: AtomicBool::new(false),
            serving: AtomicBool::new(false),
            stopping: AtomicBool::new(false),
        })
    }

    /// Appends an event listener.
    ///
    /// Listeners only receive events emitted after `serve` began; registration is
    /// closed from then on.
    pub fn add_listener(&self, listener: impl Listen) -> Result<(), ServiceError> {
        self.add_shared_listener(Arc::new(listener))
    }

    /// Appends an event listener the caller keeps a handle to.
    pub fn add_shared_listener(&self, listener: Arc<dyn Listen>) -> Result<(), ServiceError> {
        let mut reg = self.registration.lock();
        if reg.sealed {
            return Err(ServiceError::RegistrationClosed);
        }
        reg.listeners.push(listener);
        Ok(())
    }

    /// Appends a middleware; the first one registered is the outermost.
    pub fn add_middleware(&self, middleware: impl Middleware) -> Result<(), ServiceError> {
        let mut reg = self.registration.lock();
        if reg.sealed {
            return Err(ServiceError::RegistrationClosed);
        }
        reg.middleware.push(Arc::new(middleware));
        Ok(())
    }

    /// Configures the service.
    ///
    /// - `Ok(false)`: `cfg.enabled` is false; the service is intentionally disabled
    ///   and nothing is stored or registered.
    /// - `Ok(true)`: the configuration was validated and stored, and the service was
    ///   registered with `rpc` (if given) under [`SERVICE_ID`].
    pub fn init(
        self: &Arc<Self>,
        cfg: ServiceConfig,
        rpc: Option<&dyn RpcRegistry>,
    ) -> Result<bool, ServiceError> {
        if !cfg.enabled {
            tracing::debug!("http service disabled");
            return Ok(false);
        }
        // Resolved once here: `serve` never blocks on name resolution.
        let address = cfg.socket_addr()?;
        cfg.workers.validate()?;

        let _control = self.control.lock();
        self.settings
            .set(Settings { cfg, address })
            .map_err(|_| ServiceError::AlreadyConfigured)?;

        if let Some(rpc) = rpc {
            rpc.register(SERVICE_ID, ServiceRpc::new(self));
        }
        Ok(true)
    }

    /// Runs the service until the HTTP listener terminates.
    ///
    /// Returns `Ok(())` after a requested shutdown. The pool is stopped before this
    /// returns, unless it never started.
    ///
    /// # Errors
    /// - [`ServiceError::NotConfigured`] without a successful, enabled `init`
    /// - [`ServiceError::AlreadyStarted`] on every call after the first
    /// - [`ServiceError::PoolStart`] when the pool did not start (the listener never ran)
    /// - [`ServiceError::Listener`] when the listener failed
    pub async fn serve(self: &Arc<Self>) -> Result<(), ServiceError> {
        let (settings, runtime) = {
            let _control = self.control.lock();
            let settings = self.settings.get().ok_or(ServiceError::NotConfigured)?;
            if self.started.swap(true, Ordering::AcqRel) {
                return Err(ServiceError::AlreadyStarted);
            }
            (settings, self.build_runtime(settings))
        };

        if let Err(e) = runtime.pool.start() {
            tracing::error!(error = %e, "worker pool failed to start");
            return Err(ServiceError::PoolStart(e));
        }
        self.serving.store(true, Ordering::SeqCst);
        let _pool = PoolGuard::new(Arc::clone(&runtime.pool), &self.serving);

        tracing::info!(address = %settings.address, "http service started");
        let res = runtime.listener.serve(runtime.handler.clone()).await;
        match &res {
            Ok(()) => tracing::info!("http service stopped"),
            Err(e) => tracing::error!(error = %e, "http listener terminated"),
        }
        res.map_err(ServiceError::from)
    }

    /// Like [`Service::serve`], but also stops the service on SIGINT/SIGTERM/SIGQUIT
    /// (Ctrl-C on non-unix platforms).
    pub async fn serve_until_signal(self: &Arc<Self>) -> Result<(), ServiceError> {
        let service = Arc::downgrade(self);
        let watcher = tokio::spawn(async move {
            match shutdown::termination_signal().await {
                Ok(signal) => {
                    if let Some(service) = service.upgrade() {
                        tracing::info!(signal, "termination signal received");
                        service.stop();
                    }
                }
                Err(e) => tracing::warn!(error = %e, "failed to install signal handlers"),
            }
        });

        let res = self.serve().await;
        watcher.abort();
        res
    }

    /// Requests graceful shutdown, bounded by `shutdown_timeout` from the config.
    ///
    /// Idempotent and safe from any thread: only the first call after `serve` built
    /// the listener issues a shutdown. Before `serve` this is a no-op.
    pub fn stop(&self) {
        let deadline = self.settings.get().and_then(|s| s.cfg.shutdown_timeout);
        self.stop_with_deadline(deadline);
    }

    /// Requests graceful shutdown with an explicit drain deadline (`None` = unbounded).
    pub fn stop_with_deadline(&self, deadline: Option<Duration>) {
        if self.stopping.load(Ordering::Acquire) {
            return;
        }

        {
            let _control = self.control.lock();
            let Some(runtime) = self.runtime.get() else {
                return;
            };
            if self.stopping.swap(true, Ordering::AcqRel) {
                return;
            }
            if let Err(e) = runtime.listener.shutdown(deadline) {
                tracing::warn!(error = %e, "http listener shutdown failed");
            }
        }

        tracing::info!(deadline = ?deadline, "http service stopping");
        self.publish(&Event::new(EventKind::ShutdownRequested));
    }

    /// True once `stop` issued a shutdown.
    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    /// Returns a point-in-time view of the service.
    pub fn status(&self) -> ServiceStatus {
        let settings = self.settings.get();
        ServiceStatus {
            enabled: settings.is_some(),
            address: settings.map(|s| s.cfg.address.clone()),
            started: self.started.load(Ordering::Acquire),
            stopping: self.is_stopping(),
        }
    }

    /// The listen address resolved by `init`.
    ///
    /// The bound address may differ when port `0` was requested.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.settings.get().map(|s| s.address)
    }

    /// Creates the runtime handles. The caller holds the control lock.
    fn build_runtime(self: &Arc<Self>, settings: &Settings) -> Arc<Runtime> {
        let cfg = &settings.cfg;
        let (listeners, middleware) = self.registration.lock().seal();
        let _ = self.bus.set(EventBus::new(listeners));

        let pool = self.backend.new_pool(&cfg.workers);
        let bridge = self.backend.new_bridge(cfg, Arc::clone(&pool));
        let listener = self.backend.new_listener(settings.address);

        let sink = self.event_sink();
        pool.listen(sink.clone());
        bridge.listen(sink);

        let chain = MiddlewareChain::new(middleware);
        tracing::debug!(middleware = chain.len(), "http handler composed");
        let handler = chain.into_handler(Handler::from_bridge(bridge));

        let runtime = Arc::new(Runtime {
            pool,
            listener,
            handler,
        });
        // `started` guarantees a single writer.
        let _ = self.runtime.set(Arc::clone(&runtime));
        runtime
    }

    /// Sink handed to the pool and the bridge; holds the service weakly.
    fn event_sink(self: &Arc<Self>) -> EventSink {
        let service = Arc::downgrade(self);
        EventSink::new(move |ev| {
            if let Some(service) = service.upgrade() {
                service.on_event(ev);
            }
        })
    }

    /// Fans the event out, then runs crash recovery for fatal kinds.
    fn on_event(&self, ev: Event) {
        self.publish(&ev);
        if ev.kind.is_fatal() {
            self.recover(&ev);
        }
    }

    fn publish(&self, ev: &Event) {
        if let Some(bus) = self.bus.get() {
            bus.emit(ev);
        }
    }

    fn recover(&self, ev: &Event) {
        let reason = ev.reason.as_deref().unwrap_or("unknown");
        if !self.serving.load(Ordering::SeqCst) {
            tracing::debug!(reason, "worker pool failure outside serve ignored");
            return;
        }
        let (Some(settings), Some(runtime)) = (self.settings.get(), self.runtime.get()) else {
            return;
        };
        let policy = settings.cfg.restart;

        match policy.decide(self.is_stopping()) {
            Recovery::Ignore => {
                tracing::debug!(reason, policy = ?policy, "worker pool failure ignored");
            }
            Recovery::Escalate => {
                tracing::warn!(reason, "worker pool failed, stopping http service");
                self.stop();
            }
            Recovery::Restart => match runtime.pool.start() {
                Ok(()) if !self.serving.load(Ordering::SeqCst) => {
                    // `serve` returned while the pool was restarting.
                    tracing::debug!(reason, "worker pool restarted after serve, stopping it");
                    runtime.pool.stop();
                }
                Ok(()) => {
                    tracing::info!(reason, "worker pool restarted");
                    self.publish(&Event::new(EventKind::PoolRestarted).with_reason(reason));
                }
                Err(e) => {
                    tracing::error!(error = %e, "worker pool restart failed, stopping http service");
                    self.publish(
                        &Event::new(EventKind::PoolRestartFailed)
                            .with_reason(e.to_string())
                            .with_context(e),
                    );
                    self.stop();
                }
            },
        }
    }
}
