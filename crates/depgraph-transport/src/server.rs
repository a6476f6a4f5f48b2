use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinSet;

use depgraph_core::{GraphStore, Metrics};

use crate::cancel::Cancellation;
use crate::config::ServerConfig;
use crate::conn::handle_connection;
use crate::error::{is_transient_accept_error, ServerError};
use crate::logger::{Level, Logger};

/// Binds the listening endpoint, fans out a Connection Handler per
/// accepted connection, tracks them for shutdown, and surfaces
/// readiness + a cancellation signal (spec §4.5).
pub struct Server {
    config: Arc<ServerConfig>,
    graph: Arc<GraphStore>,
    metrics: Arc<Metrics>,
    logger: Arc<dyn Logger>,
    cancel: Cancellation,
    ready: Arc<AtomicBool>,
    next_conn_id: AtomicU64,
}

impl Server {
    pub fn new(config: ServerConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            config: Arc::new(config),
            graph: Arc::new(GraphStore::new()),
            metrics: Arc::new(Metrics::new()),
            logger,
            cancel: Cancellation::new(),
            ready: Arc::new(AtomicBool::new(false)),
            next_conn_id: AtomicU64::new(1),
        }
    }

    /// Shared handle to the dependency graph (e.g. for an admin surface
    /// that wants to read `stats()` directly).
    pub fn graph(&self) -> Arc<GraphStore> {
        Arc::clone(&self.graph)
    }

    /// Shared handle to the metrics counters.
    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// True from the instant the listener is bound until cancellation
    /// is requested, at which point it flips to false *before* drain
    /// begins (spec §4.5's readiness contract) so load balancers stop
    /// routing new work immediately.
    pub fn readiness(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.ready)
    }

    /// A handle callers can use to request graceful shutdown from
    /// elsewhere (e.g. an admin endpoint, or the signal-handling task
    /// in the binary crate).
    pub fn cancellation(&self) -> Cancellation {
        self.cancel.clone()
    }

    fn bind_addr(&self) -> String {
        match self.config.address.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => self.config.address.clone(),
        }
    }

    /// Bind the listener, signal readiness, then run the accept loop
    /// until cancellation fires, then drain live handlers up to
    /// `shutdown_timeout` before forcibly dropping whatever remains.
    pub async fn run(&self) -> Result<(), ServerError> {
        let addr = self.bind_addr();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(source) => {
                self.logger
                    .log(Level::Error, &format!("failed to bind listener on {addr}: {source}"));
                return Err(ServerError::Bind { addr, source });
            }
        };

        self.ready.store(true, Ordering::SeqCst);
        self.logger
            .log(Level::Info, &format!("listening on {addr}"));

        let mut handlers: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer_addr)) => self.spawn_handler(&mut handlers, stream, peer_addr),
                        Err(err) if is_transient_accept_error(&err) => {
                            // Transient per-connection accept errors are logged and the
                            // loop continues (spec §4.5's accept-loop error policy); a
                            // listener-closed error surfaces the same way here since we
                            // only ever close the listener by dropping it on our own
                            // cancellation path, which this loop has already exited by
                            // the time that happens.
                            self.logger.log(Level::Warn, &format!("accept error: {err}"));
                        }
                        Err(err) => {
                            // Anything else means the listener itself is broken, not
                            // just this one connection attempt (spec §6's "unrecoverable
                            // accept-loop error" -> non-zero exit). Bail out without
                            // draining; there is no listener left to stop accepting on.
                            self.logger.log(Level::Error, &format!("fatal accept error: {err}"));
                            self.ready.store(false, Ordering::SeqCst);
                            return Err(ServerError::AcceptFatal { source: err });
                        }
                    }
                }
            }
        }

        // Readiness must drop before draining begins, not after.
        self.ready.store(false, Ordering::SeqCst);
        drop(listener);

        self.drain(handlers).await;
        Ok(())
    }

    fn spawn_handler(&self, handlers: &mut JoinSet<()>, stream: tokio::net::TcpStream, peer_addr: SocketAddr) {
        let conn_id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
        self.metrics.inc_connections();

        let graph = Arc::clone(&self.graph);
        let metrics = Arc::clone(&self.metrics);
        let logger = Arc::clone(&self.logger);
        let cancel = self.cancel.clone();
        let config = Arc::clone(&self.config);

        handlers.spawn(async move {
            handle_connection(conn_id, stream, peer_addr, graph, metrics, logger, cancel, config)
                .await;
        });
    }

    async fn drain(&self, mut handlers: JoinSet<()>) {
        let deadline = tokio::time::sleep(self.config.shutdown_timeout);
        tokio::pin!(deadline);

        loop {
            if handlers.is_empty() {
                return;
            }
            tokio::select! {
                biased;
                _ = &mut deadline => break,
                joined = handlers.join_next() => {
                    if joined.is_none() {
                        return;
                    }
                }
            }
        }

        self.logger.log(
            Level::Warn,
            &format!(
                "shutdown deadline exceeded with {} handler(s) still live; forcing close",
                handlers.len()
            ),
        );
        handlers.shutdown().await;
    }
}
