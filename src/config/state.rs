// Application state module
// Holds the startup configuration and the swappable serve snapshot

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::snapshot::ServeConfig;
use super::types::Config;
use crate::error::Result;
use crate::logger;

/// Application state
pub struct AppState {
    /// Configuration the process was started with (listener, limits)
    pub config: Config,
    /// Path the configuration was loaded from, re-read on reload
    pub config_path: String,
    serve: RwLock<Arc<ServeConfig>>,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: &Config, config_path: &str) -> Result<Self> {
        let serve = ServeConfig::compile(config)?;
        Ok(Self {
            config: config.clone(),
            config_path: config_path.to_string(),
            cached_access_log: Arc::new(AtomicBool::new(serve.access_log)),
            serve: RwLock::new(Arc::new(serve)),
        })
    }

    /// Current snapshot; a request keeps the one it started with
    pub async fn snapshot(&self) -> Arc<ServeConfig> {
        Arc::clone(&*self.serve.read().await)
    }

    /// Replace the snapshot for subsequent requests
    pub async fn swap(&self, next: ServeConfig) {
        self.cached_access_log
            .store(next.access_log, Ordering::Relaxed);
        *self.serve.write().await = Arc::new(next);
    }

    /// Re-read the configuration file and swap in the new snapshot
    ///
    /// On error the current snapshot stays in place.
    pub async fn reload(&self) -> Result<()> {
        let config = Config::load_from(&self.config_path)?;
        let next = ServeConfig::compile(&config)?;

        let current = self.snapshot().await;
        if current.access_log_file != next.access_log_file
            || current.error_log_file != next.error_log_file
        {
            logger::reopen(next.access_log_file.as_deref(), next.error_log_file.as_deref())?;
        }

        self.swap(next).await;
        Ok(())
    }

    /// Reopen log files at their configured paths (log rotation)
    pub async fn reopen_logs(&self) -> Result<()> {
        let current = self.snapshot().await;
        logger::reopen(
            current.access_log_file.as_deref(),
            current.error_log_file.as_deref(),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_swap_keeps_in_flight_snapshot() {
        let config = Config::from_toml_str("").unwrap();
        let state = AppState::new(&config, "config").unwrap();
        let before = state.snapshot().await;
        assert!(before.allow_referer.is_none());

        let updated = Config::from_toml_str(
            r#"
            [access]
            allow_referer = "*.example"

            [logging]
            access_log = false
            "#,
        )
        .unwrap();
        state.swap(ServeConfig::compile(&updated).unwrap()).await;

        // A request holding the old snapshot is unaffected
        assert!(before.allow_referer.is_none());
        let after = state.snapshot().await;
        assert_eq!(after.allow_referer.as_ref().unwrap().as_str(), "*.example");
        assert!(!state.cached_access_log.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "[access]\nallow_referer = \"*.example\"\n").unwrap();
        let base = path.with_extension("");
        let base = base.to_str().unwrap();

        let config = Config::load_from(base).unwrap();
        let state = AppState::new(&config, base).unwrap();

        std::fs::write(&path, "[access]\nallow_referer = \"[broken\"\n").unwrap();
        assert!(state.reload().await.is_err());
        assert_eq!(
            state.snapshot().await.allow_referer.as_ref().unwrap().as_str(),
            "*.example"
        );

        std::fs::write(&path, "[access]\nallow_referer = \"*.other\"\n").unwrap();
        state.reload().await.unwrap();
        assert_eq!(
            state.snapshot().await.allow_referer.as_ref().unwrap().as_str(),
            "*.other"
        );
    }
}
