use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Config;
use crate::error::ConfigError;

/// Live-reloadable configuration holder.
///
/// The gate reads the passport fallback flag through this handle on every
/// validation, so a reload takes effect for the next request without
/// rebuilding the gate.
pub struct ConfigHandle {
    inner: Arc<ArcSwap<Config>>,
    path: PathBuf,
}

impl ConfigHandle {
    pub fn new(config: Config) -> Self {
        let path = config.config_path.clone();
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
            path,
        }
    }

    /// Load current config snapshot. Lock-free.
    pub fn load(&self) -> arc_swap::Guard<Arc<Config>> {
        self.inner.load()
    }

    pub fn load_full(&self) -> Arc<Config> {
        self.inner.load_full()
    }

    /// Reload config from disk, atomically swapping the active snapshot.
    ///
    /// Environment overrides are re-applied on top of the file, exactly as at
    /// startup. On error the previous snapshot stays active.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let fresh = self.read_fresh().map_err(|source| ConfigError::HotReload {
            path: self.path.clone(),
            source: Box::new(source),
        })?;
        self.inner.store(Arc::new(fresh));
        tracing::info!(path = %self.path.display(), "config hot-reloaded");
        Ok(())
    }

    fn read_fresh(&self) -> Result<Config, ConfigError> {
        let mut fresh = Config::load_from_path(&self.path)?;
        fresh.apply_env_overrides();
        fresh.validate()?;
        Ok(fresh)
    }

    /// Manually swap in a new config.
    pub fn store(&self, config: Config) {
        self.inner.store(Arc::new(config));
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clone for ConfigHandle {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            path: self.path.clone(),
        }
    }
}
