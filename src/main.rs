//! todo-proxy
//!
//! Serves two read-only routes backed by an upstream todo API, with one
//! OpenTelemetry span per request.
//!
//! ```text
//!     Client ──▶ middleware ──▶ dispatcher ──▶ route match ──▶ handler ──▶ upstream API
//!               (request id,       │                              │
//!                trace, timeout)   └── span / metrics / logs ◀────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;

use todo_proxy::cli::Cli;
use todo_proxy::lifecycle::{wait_for_signal, Shutdown};
use todo_proxy::observability::{init_tracer, logging, metrics};
use todo_proxy::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "todo-proxy starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = config.upstream.timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let telemetry = init_tracer(&config.observability);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, telemetry.as_ref())?;
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        res = &mut server_task => res??,
        res = wait_for_signal() => {
            res?;
            shutdown.trigger();
            server_task.await??;
        }
    }

    if let Some(telemetry) = telemetry {
        if let Err(e) = telemetry.shutdown() {
            tracing::warn!(error = %e, "Tracer provider shutdown failed");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
