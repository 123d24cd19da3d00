//! OS signal handling.
//!
//! SIGINT (Ctrl+C) and, on unix, SIGTERM both request graceful shutdown.

use std::io;

/// Resolve once a termination signal arrives.
pub async fn wait_for_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    tracing::info!("Termination signal received");
    Ok(())
}
