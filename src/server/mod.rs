// Server module entry point
// Binds the listener, installs signal handlers and runs the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;
use tokio::task::LocalSet;

use crate::config::{AppState, Config};
use crate::error::Result;
use crate::logger;

// Re-export commonly used items
pub use listener::create_reusable_listener;
pub use signal::SignalHandler;
pub use server_loop::start_server_loop;

/// Serve until SIGTERM/SIGINT
///
/// `config_path` is re-read on every SIGHUP.
pub async fn run(config: Config, config_path: &str) -> Result<()> {
    let addr = config.get_socket_addr()?;
    let state = Arc::new(AppState::new(&config, config_path)?);
    let listener = create_reusable_listener(addr)?;

    let signals = Arc::new(SignalHandler::new());
    signal::start_signal_handler(Arc::clone(&signals))?;

    let mounts = state.snapshot().await.mounts.len();
    logger::log_server_start(&addr, &config, mounts);

    // Use LocalSet for spawn_local support
    let local = LocalSet::new();
    local
        .run_until(start_server_loop(listener, state, signals))
        .await;
    Ok(())
}
