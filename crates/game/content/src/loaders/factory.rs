//! Content factory over a data directory.

use std::path::{Path, PathBuf};

use action_core::EngineConfig;

use crate::loaders::{ActionLoader, ConfigLoader, LoadResult, Scenario, WorldLoader};
use crate::registry::ActionFactory;

/// Loads every kind of content from one data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml        (optional)
/// ├── actions/
/// │   ├── base.ron
/// │   └── mod_overrides.ron
/// └── worlds/
///     └── village.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`, or defaults if absent.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(EngineConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load every catalogue under `actions/` into a fresh factory.
    pub fn load_actions(&self) -> LoadResult<ActionFactory> {
        let mut factory = ActionFactory::new();
        let registered = ActionLoader::load_dir(&self.data_dir.join("actions"), &mut factory)?;
        tracing::info!(registered, total = factory.len(), "action prototypes loaded");
        Ok(factory)
    }

    /// Load a scenario from `worlds/{name}.ron`.
    pub fn load_world(&self, name: &str) -> LoadResult<Scenario> {
        let path = self.data_dir.join("worlds").join(format!("{}.ron", name));
        WorldLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let factory = ContentFactory::new("/nonexistent/action-data");
        assert_eq!(factory.load_config().unwrap(), EngineConfig::default());
        assert!(factory.load_actions().is_err());
    }
}
