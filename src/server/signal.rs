// Signal handling module
//
// Supported signals:
// - SIGTERM: graceful shutdown
// - SIGINT:  graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

/// Spawn a background task that turns SIGTERM/SIGINT into a shutdown
/// notification for the accept loop.
#[cfg(unix)]
pub fn spawn_shutdown_listener(shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
            crate::logger::log_error("Failed to register SIGTERM handler");
            return;
        };
        let Ok(mut sigint) = signal(SignalKind::interrupt()) else {
            crate::logger::log_error("Failed to register SIGINT handler");
            return;
        };

        tokio::select! {
            _ = sigterm.recv() => {
                println!("\n[SIGNAL] SIGTERM received, shutting down");
            }
            _ = sigint.recv() => {
                println!("\n[SIGNAL] SIGINT received (Ctrl+C), shutting down");
            }
        }

        // notify_one stores a permit, so the signal is not lost even if the
        // accept loop is not parked on notified() at this instant
        shutdown.notify_one();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn spawn_shutdown_listener(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            println!("\n[SIGNAL] Ctrl+C received, shutting down");
            shutdown.notify_one();
        }
    });
}
