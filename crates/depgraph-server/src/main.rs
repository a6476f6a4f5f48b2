//! `depgraphd`: binds the line-protocol listener, optionally the admin
//! HTTP surface, and wires both to one shared cancellation signal so
//! a SIGINT/SIGTERM drains in-flight connections before the process
//! exits (spec §6).

mod args;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use depgraph_transport::{Logger, NullLogger, Server, ServerConfig, TracingLogger};

use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if !args.quiet {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .init();
    }

    let config = ServerConfig {
        address: args.address.clone(),
        read_timeout: args.read_timeout,
        shutdown_timeout: args.shutdown_timeout,
        max_line_len: args.max_line_len,
    };

    let logger: Arc<dyn Logger> = if args.quiet {
        Arc::new(NullLogger)
    } else {
        Arc::new(TracingLogger)
    };

    let server = Arc::new(Server::new(config, logger.clone()));

    let signal_cancel = server.cancellation();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        signal_cancel.cancel();
    });

    let admin_handle = match &args.admin_address {
        Some(admin_address) => Some(spawn_admin(admin_address.clone(), &server, !args.quiet)),
        None => None,
    };

    let result = server.run().await;

    if let Some(handle) = admin_handle {
        handle.abort();
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("depgraphd: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Waits for either Ctrl-C or, on Unix, a SIGTERM — whichever arrives
/// first triggers graceful shutdown (spec §6's "platform's
/// interrupt/terminate signals").
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn spawn_admin(admin_address: String, server: &Server, logging_enabled: bool) -> tokio::task::JoinHandle<()> {
    let graph = server.graph();
    let metrics = server.metrics();
    let ready = server.readiness();

    tokio::spawn(async move {
        let state = depgraph_admin::AdminState::new(graph, metrics, ready, logging_enabled);
        let app = depgraph_admin::router(state);

        match tokio::net::TcpListener::bind(&admin_address).await {
            Ok(listener) => {
                if let Err(err) = axum::serve(listener, app).await {
                    tracing::warn!(%err, "admin HTTP surface exited");
                }
            }
            Err(err) => {
                tracing::warn!(address = %admin_address, %err, "failed to bind admin HTTP surface");
            }
        }
    })
}
