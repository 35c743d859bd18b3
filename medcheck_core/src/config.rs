//! Configuration file support for medcheck.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/medcheck/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub formulary: FormularyConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Formulary source configuration
///
/// When `path` is set, the CLI loads the reference tables from that TOML
/// file instead of using the built-in formulary.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct FormularyConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Report rendering configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// Emit reports as JSON instead of formatted text
    #[serde(default)]
    pub json: bool,
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME")
                .expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("medcheck").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
