//! OS signal adapters.
//!
//! Signal handlers only forward events into ordinary tasks: `SIGHUP` becomes a
//! [`ReportTrigger::request`], `SIGINT`/`SIGTERM` resolve the shutdown future.

use crackserver_core::ReportTrigger;
use tokio::{signal, task::JoinHandle};
use tracing::{info, warn};

/// Forwards every `SIGHUP` to the statistics reporter.
///
/// # Errors
///
/// Fails if the signal handler cannot be installed.
#[cfg(unix)]
pub fn forward_report_signal(trigger: ReportTrigger) -> std::io::Result<JoinHandle<()>> {
    use signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    Ok(tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            if !trigger.request() {
                warn!("Statistics reporter is gone, ignoring SIGHUP");
                break;
            }
        }
    }))
}

#[cfg(not(unix))]
pub fn forward_report_signal(trigger: ReportTrigger) -> std::io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        let _trigger = trigger;
        core::future::pending::<()>().await;
    }))
}

/// Resolves on Ctrl+C or `SIGTERM`.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                core::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = core::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            core::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }

    info!("Shutdown signal received, terminating gracefully...");
}
