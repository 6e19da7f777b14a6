//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::{DiagpullConfig, validate_config};

/// Environment variable naming an alternative configuration file.
pub const CONFIG_ENV: &str = "DIAGPULL_CONFIG";

/// Production implementation of `ConfigStore` that reads a YAML file from disk.
///
/// A path given on the command line or through [`CONFIG_ENV`] must exist.
/// The default `~/.diagpull/config.yaml` is optional.
#[derive(Debug, Default)]
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    fn requested(&self) -> Option<PathBuf> {
        self.explicit
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<DiagpullConfig> {
        let required = self.requested().is_some();
        let path = self.path()?;
        if !path.exists() {
            anyhow::ensure!(!required, "config file {} not found", path.display());
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(DiagpullConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: DiagpullConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        validate_config(&config).with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = self.requested() {
            return Ok(path);
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".diagpull").join("config.yaml"))
    }
}
