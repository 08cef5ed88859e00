// Signal handling module (nginx-style)
//
// Supported signals:
// - SIGHUP:  Reload configuration
// - SIGUSR1: Reopen log files
// - SIGTERM: Shutdown
// - SIGINT:  Shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Signal handler state
///
/// Each notification is consumed by the server loop.
#[derive(Debug, Default)]
pub struct SignalHandler {
    /// Shutdown signal (SIGTERM, SIGINT)
    pub shutdown: Notify,
    /// Reload signal (SIGHUP)
    pub reload: Notify,
    /// Log reopen signal (SIGUSR1)
    pub reopen_logs: Notify,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Register signal handlers and forward them to `handler` (Unix only)
///
/// Registration happens before returning, so failures surface at startup.
///
/// | Signal  | Action           | Nginx Equivalent   |
/// |---------|------------------|--------------------|
/// | SIGHUP  | Reload config    | `nginx -s reload`  |
/// | SIGUSR1 | Reopen logs      | `nginx -s reopen`  |
/// | SIGTERM | Stop             | `nginx -s stop`    |
/// | SIGINT  | Stop             | Ctrl+C             |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    logger::log_info(&format!(
        "Signals: HUP reload, USR1 reopen logs, TERM/INT stop (pid {})",
        std::process::id()
    ));

    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(()) = sighup.recv() => {
                    logger::log_info("SIGHUP received, reloading configuration");
                    handler.reload.notify_one();
                }
                Some(()) = sigusr1.recv() => {
                    logger::log_info("SIGUSR1 received, reopening log files");
                    handler.reopen_logs.notify_one();
                }
                Some(()) = sigterm.recv() => {
                    logger::log_info("SIGTERM received, shutting down");
                    handler.shutdown.notify_one();
                    break;
                }
                Some(()) = sigint.recv() => {
                    logger::log_info("SIGINT received, shutting down");
                    handler.shutdown.notify_one();
                    break;
                }
                else => break,
            }
        }
    });

    Ok(())
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) -> std::io::Result<()> {
    logger::log_info("Only Ctrl+C is supported on this platform");

    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_info("Ctrl+C received, shutting down");
            handler.shutdown.notify_one();
        }
    });

    Ok(())
}
