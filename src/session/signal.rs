//! Process termination signals.

use std::future::Future;

/// Resolve on the first interrupt or terminate signal.
///
/// On unix both handlers are installed when this is called, not when the
/// future is first polled, so a signal sent right after startup is not lost.
/// Must be called from within a tokio runtime.
pub fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    #[cfg(unix)]
    let handlers = {
        use tokio::signal::unix::{SignalKind, signal};
        signal(SignalKind::interrupt()).and_then(|sigint| {
            signal(SignalKind::terminate()).map(|sigterm| (sigint, sigterm))
        })
    };

    async move {
        #[cfg(unix)]
        match handlers {
            Ok((mut sigint, mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => tracing::info!("received interrupt"),
                    _ = sigterm.recv() => tracing::info!("received terminate"),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot install signal handlers, waiting for ctrl-c only");
                wait_ctrl_c().await;
            }
        }

        #[cfg(not(unix))]
        wait_ctrl_c().await;
    }
}

async fn wait_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received interrupt"),
        Err(e) => {
            tracing::error!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}
