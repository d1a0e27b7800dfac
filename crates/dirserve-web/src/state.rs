use std::sync::Arc;

use dirserve_core::Root;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Canonical root every request path resolves under.
    pub root: Arc<Root>,
}

impl AppState {
    /// Opens the configured root directory.
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let root = Root::open(&config.filesystem.root).map_err(|e| {
            anyhow::anyhow!(
                "Cannot serve {}: {e}",
                config.filesystem.root.display()
            )
        })?;
        Ok(Self {
            config: Arc::new(config),
            root: Arc::new(root),
        })
    }
}
