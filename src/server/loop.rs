// Server loop module
// Accepts connections and reacts to reload, log reopen and shutdown signals

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Run until a shutdown signal arrives
///
/// Must be polled inside a `LocalSet`: connections are served with
/// `spawn_local`.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) {
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

            () = signals.reload.notified() => {
                let result = state.reload().await;
                logger::log_reload(&result);
            }

            () = signals.reopen_logs.notified() => {
                match state.reopen_logs().await {
                    Ok(()) => logger::log_info("Log files reopened"),
                    Err(e) => logger::log_error(&format!("Failed to reopen log files: {e}")),
                }
            }

            () = signals.shutdown.notified() => {
                logger::log_shutdown();
                break;
            }
        }
    }
}
