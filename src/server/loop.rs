// Server loop module
// Accept loop with graceful shutdown on interrupt

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How long shutdown waits for in-flight connections before exiting anyway
const DRAIN_DEADLINE: std::time::Duration = std::time::Duration::from_secs(5);

/// Run the accept loop until a shutdown signal arrives, then drain.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_shutdown_requested();
                break;
            }
        }
    }

    // Stop accepting before draining what is already in flight
    drop(listener);
    drain_connections(&active_connections).await;
    logger::log_shutdown_complete();
    Ok(())
}

/// Wait for active connections to finish, up to the drain deadline.
async fn drain_connections(active_connections: &Arc<AtomicUsize>) {
    let deadline = tokio::time::Instant::now() + DRAIN_DEADLINE;

    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown drain deadline reached with {remaining} connection(s) still active"
            ));
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}
