//! Service Supervisor
//!
//! Opens the country database, binds both listeners, runs the HTTP and
//! gRPC adapters side by side and drives the ordered shutdown:
//! gRPC drain, bounded HTTP drain, then database close.

use crate::adapters::inbound::{GrpcServer, HttpServer};
use crate::adapters::outbound::GeoStore;
use crate::application::GeoFenceService;
use crate::config::Config;
use crate::infrastructure::shutdown::{shutdown_signal, ShutdownController};
use anyhow::Context;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};
use tokio::task::{JoinError, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Starting,
    Serving,
    ShuttingDown,
    Stopped,
}

/// One running transport: its stop trigger and its task.
struct Listener {
    name: &'static str,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<anyhow::Result<()>>,
    finished: bool,
}

impl Listener {
    fn spawn<F, Fut>(name: &'static str, serve: F) -> Self
    where
        F: FnOnce(oneshot::Receiver<()>) -> Fut,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let (stop_tx, stop_rx) = oneshot::channel();
        Self {
            name,
            stop: Some(stop_tx),
            task: tokio::spawn(serve(stop_rx)),
            finished: false,
        }
    }

    /// Error describing a listener that exited while it should be serving.
    fn failure(name: &'static str, result: Result<anyhow::Result<()>, JoinError>) -> anyhow::Error {
        let err = match result {
            Ok(Ok(())) => anyhow::anyhow!("{} listener exited unexpectedly", name),
            Ok(Err(e)) => e.context(format!("{} listener failed", name)),
            Err(e) => anyhow::anyhow!("{} listener task failed: {}", name, e),
        };
        tracing::error!(listener = name, error = %format!("{:#}", err), "component failure, shutting down");
        err
    }

    /// Stop accepting new connections. Open requests keep running.
    fn signal(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }

    /// Wait up to `timeout` for the transport to drain after [`signal`].
    /// Returns false if the deadline passed and the task was aborted.
    ///
    /// [`signal`]: Listener::signal
    async fn join(&mut self, timeout: Duration) -> bool {
        if self.finished {
            return true;
        }
        self.finished = true;

        match tokio::time::timeout(timeout, &mut self.task).await {
            Ok(Ok(Ok(()))) => true,
            Ok(Ok(Err(e))) => {
                tracing::error!(listener = self.name, error = %e, "listener stopped with error");
                true
            }
            Ok(Err(e)) => {
                tracing::error!(listener = self.name, error = %e, "listener task failed");
                true
            }
            Err(_) => {
                self.task.abort();
                false
            }
        }
    }
}

/// Runs both transports over one store.
pub struct ServiceSupervisor {
    store: Arc<GeoStore>,
    service: Arc<GeoFenceService>,
    http_listener: TcpListener,
    grpc_listener: TcpListener,
    drain_timeout: Duration,
    shutdown: ShutdownController,
    state: watch::Sender<SupervisorState>,
}

impl ServiceSupervisor {
    /// Open the database named in `cfg` and bind both listeners.
    pub async fn start(cfg: &Config) -> anyhow::Result<Self> {
        let store = GeoStore::open(&cfg.db_path)
            .with_context(|| format!("open GeoIP database {}", cfg.db_path))?;
        Self::start_with_store(Arc::new(store), cfg).await
    }

    /// Bind both listeners over an already-open store.
    pub async fn start_with_store(store: Arc<GeoStore>, cfg: &Config) -> anyhow::Result<Self> {
        let (state, _) = watch::channel(SupervisorState::Starting);

        let http_listener = TcpListener::bind(cfg.http_addr())
            .await
            .with_context(|| format!("bind HTTP listener on {}", cfg.http_addr()))?;
        let grpc_listener = TcpListener::bind(cfg.grpc_addr())
            .await
            .with_context(|| format!("bind gRPC listener on {}", cfg.grpc_addr()))?;

        Ok(Self {
            service: Arc::new(GeoFenceService::from_store(store.clone())),
            store,
            http_listener,
            grpc_listener,
            drain_timeout: cfg.drain_timeout(),
            shutdown: ShutdownController::new(),
            state,
        })
    }

    pub fn http_addr(&self) -> std::io::Result<SocketAddr> {
        self.http_listener.local_addr()
    }

    pub fn grpc_addr(&self) -> std::io::Result<SocketAddr> {
        self.grpc_listener.local_addr()
    }

    /// Handle that triggers the same shutdown as SIGTERM.
    pub fn shutdown_handle(&self) -> ShutdownController {
        self.shutdown.clone()
    }

    pub fn state(&self) -> watch::Receiver<SupervisorState> {
        self.state.subscribe()
    }

    /// Serve until a termination signal or a listener failure, then shut
    /// down in order. Returns an error if a listener failed while serving.
    pub async fn run(self) -> anyhow::Result<()> {
        let ServiceSupervisor {
            store,
            service,
            http_listener,
            grpc_listener,
            drain_timeout,
            shutdown,
            state,
        } = self;

        let signals = tokio::spawn(shutdown_signal(shutdown.clone()));

        let grpc_server = GrpcServer::new(grpc_listener, service.clone(), shutdown.clone());
        let http_server = HttpServer::new(http_listener, service, shutdown.clone());

        let grpc = Listener::spawn("grpc", move |stop| {
            grpc_server.serve(async move {
                let _ = stop.await;
            })
        });
        let http = Listener::spawn("http", move |stop| {
            http_server.serve(async move {
                let _ = stop.await;
            })
        });

        let result = supervise(store, grpc, http, drain_timeout, &shutdown, &state).await;
        signals.abort();
        result
    }
}

/// Serve until shutdown is triggered or a listener exits, then stop both
/// listeners, drain gRPC, drain HTTP within `drain_timeout` and close the
/// store.
async fn supervise(
    store: Arc<GeoStore>,
    mut grpc: Listener,
    mut http: Listener,
    drain_timeout: Duration,
    shutdown: &ShutdownController,
    state: &watch::Sender<SupervisorState>,
) -> anyhow::Result<()> {
    transition(state, SupervisorState::Serving);

    let failure = tokio::select! {
        _ = shutdown.wait() => None,
        result = &mut grpc.task => {
            grpc.finished = true;
            Some(Listener::failure(grpc.name, result))
        }
        result = &mut http.task => {
            http.finished = true;
            Some(Listener::failure(http.name, result))
        }
    };
    shutdown.shutdown();

    transition(state, SupervisorState::ShuttingDown);

    // Both stop accepting now; only the drains are ordered.
    grpc.signal();
    http.signal();

    // gRPC first: tonic drains open calls natively.
    if !grpc.join(drain_timeout).await {
        tracing::warn!(timeout_secs = drain_timeout.as_secs(), "gRPC drain timed out");
    }

    // HTTP next, bounded; whatever is still running is abandoned.
    if !http.join(drain_timeout).await {
        tracing::warn!(
            abandoned = shutdown.in_flight(),
            timeout_secs = drain_timeout.as_secs(),
            "HTTP drain timed out, abandoning in-flight requests"
        );
    }

    // Last, so requests still draining above could look up countries.
    store.close();

    transition(state, SupervisorState::Stopped);
    tracing::info!("shutdown complete");

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn transition(state: &watch::Sender<SupervisorState>, next: SupervisorState) {
    tracing::info!(state = ?next, "supervisor state");
    state.send_replace(next);
}
