//! Shared runtime helpers.

use tracing::{error, info};

/// Wait for Ctrl+C.
///
/// Resolves once the interrupt arrives; the caller decides what to flush
/// and tear down.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("interrupt received"),
        Err(err) => {
            error!(%err, "failed to listen for interrupt");
            // Without a listener the run can only end on its own.
            std::future::pending::<()>().await;
        }
    }
}
