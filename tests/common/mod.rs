//! Test doubles for the service collaborators.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use httpvisor::{
    AxumListener, Backend, Bridge, Event, EventKind, EventSink, Handler, HttpListener, ListenerError,
    PoolError, PoolSpec, Request, Response, ServiceConfig, WorkerPool, attributes,
};

pub fn config() -> ServiceConfig {
    let mut cfg = ServiceConfig::default();
    cfg.enabled = true;
    cfg.address = "127.0.0.1:0".into();
    cfg.workers.command = "php worker.php".into();
    cfg.workers.num_workers = 2;
    cfg
}

/// Pool that counts calls and fails `start` on demand.
#[derive(Default)]
pub struct MockPool {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    /// Number of upcoming `start` calls that fail.
    pub fail_next: AtomicUsize,
    /// Report a `PoolFailure` from inside the next `start`.
    pub fail_during_start: AtomicBool,
    sink: Mutex<Option<EventSink>>,
}

impl MockPool {
    /// Emits an event through the sink the service wired in.
    pub fn fire(&self, ev: Event) {
        let sink = self.sink.lock().clone();
        if let Some(sink) = sink {
            sink.emit(ev);
        }
    }

    pub fn fail(&self) {
        self.fire(Event::new(EventKind::PoolFailure).with_reason("relay closed"));
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl WorkerPool for MockPool {
    fn listen(&self, sink: EventSink) {
        *self.sink.lock() = Some(sink);
    }

    fn start(&self) -> Result<(), PoolError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_during_start.swap(false, Ordering::SeqCst) {
            self.fail();
        }
        let failing = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(PoolError::start("php: command not found"));
        }
        self.fire(Event::new(EventKind::PoolStarted));
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Bridge that records what it received and answers `200 ok`.
#[derive(Default)]
pub struct RecordingBridge {
    /// (path, had attribute bag)
    pub seen: Mutex<Vec<(String, bool)>>,
    sink: Mutex<Option<EventSink>>,
}

#[async_trait]
impl Bridge for RecordingBridge {
    fn listen(&self, sink: EventSink) {
        *self.sink.lock() = Some(sink);
    }

    async fn handle(&self, req: Request) -> Response {
        let path = req.uri().path().to_owned();
        let bag = attributes::get(&req).is_some();
        self.seen.lock().push((path.clone(), bag));

        let sink = self.sink.lock().clone();
        if let Some(sink) = sink {
            sink.emit(Event::new(EventKind::HttpResponse).with_context(path));
        }
        Response::new(Body::from("ok"))
    }
}

/// Listener that never binds; `serve` keeps the handler and waits for `shutdown`.
#[derive(Default)]
pub struct MockListener {
    pub handler: Mutex<Option<Handler>>,
    pub serves: AtomicUsize,
    pub shutdowns: AtomicUsize,
    pub deadline: Mutex<Option<Option<Duration>>>,
    pub fail_serve: AtomicBool,
    token: CancellationToken,
}

#[async_trait]
impl HttpListener for MockListener {
    async fn serve(&self, handler: Handler) -> Result<(), ListenerError> {
        *self.handler.lock() = Some(handler);
        self.serves.fetch_add(1, Ordering::SeqCst);
        if self.fail_serve.load(Ordering::SeqCst) {
            return Err(ListenerError::Io(std::io::Error::other("accept failed")));
        }
        self.token.cancelled().await;
        Ok(())
    }

    fn shutdown(&self, deadline: Option<Duration>) -> Result<(), ListenerError> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        *self.deadline.lock() = Some(deadline);
        self.token.cancel();
        Ok(())
    }
}

impl MockListener {
    pub fn serves(&self) -> usize {
        self.serves.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    /// Sends `GET path` through the served handler.
    pub async fn get(&self, path: &str) -> Response {
        let handler = self.handler.lock().clone().expect("listener is serving");
        let req = axum::http::Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("valid request");
        handler.call(req).await
    }
}

/// Which listener the backend hands out.
pub enum ListenerKind {
    Mock(Arc<MockListener>),
    Axum(Mutex<Option<Arc<AxumListener>>>),
}

/// Backend returning shared handles so tests can inspect them.
pub struct TestBackend {
    pub pool: Arc<MockPool>,
    pub bridge: Arc<RecordingBridge>,
    pub listener: ListenerKind,
    pub pools_created: AtomicUsize,
    /// Address handed to `new_listener`.
    pub listener_addr: Mutex<Option<SocketAddr>>,
    /// Delay inside `new_pool`, to widen the `serve` setup window.
    pub build_delay_ms: AtomicU64,
}

impl TestBackend {
    pub fn mock() -> Arc<Self> {
        Arc::new(Self {
            pool: Arc::default(),
            bridge: Arc::default(),
            listener: ListenerKind::Mock(Arc::default()),
            pools_created: AtomicUsize::new(0),
            listener_addr: Mutex::new(None),
            build_delay_ms: AtomicU64::new(0),
        })
    }

    pub fn axum() -> Arc<Self> {
        Arc::new(Self {
            pool: Arc::default(),
            bridge: Arc::default(),
            listener: ListenerKind::Axum(Mutex::new(None)),
            pools_created: AtomicUsize::new(0),
            listener_addr: Mutex::new(None),
            build_delay_ms: AtomicU64::new(0),
        })
    }

    pub fn mock_listener(&self) -> &MockListener {
        match &self.listener {
            ListenerKind::Mock(l) => l,
            ListenerKind::Axum(_) => panic!("backend uses the axum listener"),
        }
    }

    /// Waits for the axum listener to be created and bound.
    pub async fn bound_addr(&self) -> SocketAddr {
        let ListenerKind::Axum(slot) = &self.listener else {
            panic!("backend uses the mock listener");
        };
        let listener = loop {
            let created = slot.lock().clone();
            match created {
                Some(l) => break l,
                None => tokio::time::sleep(Duration::from_millis(5)).await,
            }
        };
        listener.wait_bound().await.expect("listener bound")
    }
}

/// `Backend` is implemented on a newtype so the test keeps its own `Arc`.
pub struct Shared(pub Arc<TestBackend>);

impl Backend for Shared {
    fn new_pool(&self, _spec: &PoolSpec) -> Arc<dyn WorkerPool> {
        self.0.pools_created.fetch_add(1, Ordering::SeqCst);
        let delay = self.0.build_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay));
        }
        self.0.pool.clone()
    }

    fn new_bridge(&self, _cfg: &ServiceConfig, _pool: Arc<dyn WorkerPool>) -> Arc<dyn Bridge> {
        self.0.bridge.clone()
    }

    fn new_listener(&self, address: SocketAddr) -> Arc<dyn HttpListener> {
        *self.0.listener_addr.lock() = Some(address);
        match &self.0.listener {
            ListenerKind::Mock(l) => l.clone(),
            ListenerKind::Axum(slot) => {
                let listener = Arc::new(AxumListener::new(address));
                *slot.lock() = Some(listener.clone());
                listener
            }
        }
    }
}

/// Records event kinds in delivery order.
#[derive(Clone, Default)]
pub struct Recorder {
    pub events: Arc<Mutex<Vec<EventKind>>>,
}

impl Recorder {
    pub fn listener(&self) -> impl Fn(&Event) + Send + Sync + use<> {
        let events = self.events.clone();
        move |ev: &Event| events.lock().push(ev.kind)
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().clone()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.lock().iter().filter(|k| **k == kind).count()
    }
}

/// Polls `cond` until it holds or two seconds elapse.
pub async fn eventually(mut cond: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !cond() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within 2s"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
