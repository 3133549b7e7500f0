use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use wedlot_core::config::StorageBackend;
use wedlot_core::AppConfig;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub memory: bool,
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("wedlot"),
            config_path: None,
            memory: false,
            verbose: false,
        }
    }
}

impl CliConfig {
    pub fn config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(CONFIG_FILE))
    }

    /// Config file, then `WEDLOT_*` variables, then command-line flags.
    pub fn app_config(&self) -> anyhow::Result<AppConfig> {
        let path = self.config_path();
        let mut config = AppConfig::load(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        config.apply_env()?;

        if self.memory {
            config.storage.backend = StorageBackend::Memory;
        }

        config.validate()?;
        Ok(config)
    }
}
