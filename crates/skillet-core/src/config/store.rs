//! Loading `config.toml`.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::SkilletConfig;

const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = "skillet";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// `<platform config dir>/skillet/config.toml`
    pub fn from_default_dir() -> anyhow::Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(Self::new(base.join(APP_DIR)))
    }

    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_path: config_dir.join(CONFIG_FILE),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Parsed configuration; a missing file yields the defaults.
    pub fn load(&self) -> anyhow::Result<SkilletConfig> {
        let path = &self.config_path;
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("Invalid config file: {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}; using defaults", path.display());
                Ok(SkilletConfig::new())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}
