use crate::errors::{GeminiError, GeminiResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for the default config directory
pub const APP_NAME: &str = "pooling-advisor";

/// Environment variable consulted for the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration struct for the Gemini text-generation collaborator
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub system_prompt: Option<String>,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            system_prompt: Some(
                "You answer only with a single JSON object matching the requested schema."
                    .to_string(),
            ),
            model_name: Some(DEFAULT_MODEL.to_string()),
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            temperature: Some(0.4),
            timeout_secs: Some(30),
        }
    }
}

impl GeminiConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> GeminiResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                GeminiError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                GeminiError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            Ok(Self::default().merge(&config))
        } else {
            Ok(Self::default())
        }
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            system_prompt: other
                .system_prompt
                .clone()
                .or_else(|| self.system_prompt.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            temperature: other.temperature.or(self.temperature),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Fills the API key from the environment (and a `.env` file) when one is set.
    pub fn with_env_overrides(mut self) -> Self {
        dotenvy::dotenv().ok();
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        self
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> GeminiResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        GeminiError::ConfigError("Could not determine home directory".to_string())
    })?;

    let config_dir = home_dir.join(".config").join(app_name);

    Ok(config_dir)
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> GeminiResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempdir().unwrap();
        let config = GeminiConfig::load_from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GeminiConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"abc\"\nmodel_name = \"gemini-pro\"\n").unwrap();

        let config = GeminiConfig::load_from_file(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.model_name.as_deref(), Some("gemini-pro"));
        assert_eq!(config.base_url.as_deref(), Some(DEFAULT_BASE_URL));
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").unwrap();

        let err = GeminiConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, GeminiError::ConfigError(_)));
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = GeminiConfig::default();
        let other = GeminiConfig {
            api_key: Some("override".to_string()),
            system_prompt: None,
            model_name: None,
            base_url: Some("http://localhost:9000".to_string()),
            temperature: None,
            timeout_secs: Some(5),
        };

        let merged = base.merge(&other);
        assert_eq!(merged.api_key.as_deref(), Some("override"));
        assert_eq!(merged.model_name, base.model_name);
        assert_eq!(merged.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(merged.temperature, base.temperature);
        assert_eq!(merged.timeout_secs, Some(5));
    }
}
