pub mod auth;
pub mod capture;
pub mod status;

use anyhow::{Context, Result};
use moodflix_application::SessionContext;
use moodflix_core::config::RootConfig;
use moodflix_infrastructure::{ConfigService, FileSessionStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

/// Everything a command needs: validated config and the restored session.
pub struct App {
    pub config: RootConfig,
    pub session: SessionContext,
}

impl App {
    pub async fn bootstrap(config_path: Option<PathBuf>) -> Result<Self> {
        let service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new(),
        };
        let config = service.get_config().context("Failed to load configuration")?;
        init_tracing(&config.logging.level);

        let store = FileSessionStore::new().context("Failed to locate session file")?;
        tracing::debug!("[Bootstrap] Session file: {}", store.path().display());
        let session = SessionContext::restore(Arc::new(store)).await;

        Ok(Self { config, session })
    }
}

/// `RUST_LOG` wins over the configured level. Logs go to stderr.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
