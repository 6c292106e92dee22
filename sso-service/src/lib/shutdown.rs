//! Graceful shutdown handling.

use tokio::signal;

/// Wait for Ctrl-C or, on Unix, SIGTERM.
///
/// If a handler cannot be installed that source is ignored and the other
/// one still works.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!(signal = "SIGINT", "shutdown signal received");
        }
        _ = terminate => {
            tracing::info!(signal = "SIGTERM", "shutdown signal received");
        }
    }
}
