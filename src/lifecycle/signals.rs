//! OS signal handling.

use super::Shutdown;

async fn interrupt() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(error) => {
            tracing::error!(error = %error, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

/// Wait for Ctrl+C or SIGTERM, then broadcast shutdown.
pub async fn wait_for_signal(shutdown: Shutdown) {
    tokio::select! {
        _ = interrupt() => {}
        _ = terminate() => {}
    }
    tracing::info!("Shutdown signal received");
    shutdown.trigger();
}
