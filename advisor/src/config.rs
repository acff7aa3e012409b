use pooling_core::config::{get_default_config_file, GeminiConfig, APP_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Core(#[from] pooling_core::GeminiError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_http_addr")]
    pub http_addr: SocketAddr,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_http_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            http_addr: default_http_addr(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the daemon config from `path`.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        // Keys missing from the [gemini] table fall back to defaults
        config.gemini = GeminiConfig::default().merge(&config.gemini);
        Ok(config)
    }

    /// Loads `~/.config/pooling-advisor/config.toml`, or defaults when it does not exist.
    pub fn load_from_default() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(get_default_config_file(APP_NAME)?)
    }
}
