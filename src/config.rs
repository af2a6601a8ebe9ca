use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;
use crate::validation::{require_non_empty, require_positive};

/// Optional TOML config file location.
pub const CONFIG_PATH_ENV: &str = "FORM_BUILDER_CONFIG";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_MAX_TOKENS: u32 = 1500;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

/// Completion API settings. `api_key` normally comes from `OPENAI_API_KEY`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: String::new(),
            model: DEFAULT_MODEL.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Daily rolling log files are written here when set.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load `.env`, then the optional TOML file, then environment overrides.
    pub fn load() -> Result<Self, AppError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Failed to read .env file: {}", e);
            }
        }

        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, AppError> {
        toml::from_str(raw).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Apply environment-style overrides. `lookup` abstracts `std::env::var` for tests.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("OPENAI_API_KEY") {
            self.provider.api_key = key;
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            self.provider.base_url = url;
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.provider.model = model;
        }
        if let Some(host) = get("FORM_BUILDER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("FORM_BUILDER_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!(port = %port, "Ignoring invalid FORM_BUILDER_PORT"),
            }
        }
        if let Some(dir) = get("FORM_BUILDER_LOG_DIR") {
            self.logging.log_dir = Some(PathBuf::from(dir));
        }
    }

    /// Checks required before serving requests.
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("provider.api_key", &self.provider.api_key)?;
        require_non_empty("provider.base_url", &self.provider.base_url)?;
        require_non_empty("provider.model", &self.provider.model)?;
        require_positive("provider.max_tokens", self.provider.max_tokens)?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid bind address: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.provider.model, "gpt-4o");
        assert_eq!(config.provider.max_tokens, 1500);
        assert_eq!(config.bind_addr().unwrap().port(), 3000);
        assert!(config.logging.log_dir.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [provider]
            model = "gpt-4o-mini"
            max_tokens = 800
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.provider.max_tokens, 800);
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_toml("[provider\nmodel = 1"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4.1"),
            ("FORM_BUILDER_PORT", "8080"),
            ("FORM_BUILDER_HOST", ""),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.provider.api_key, "sk-test");
        assert_eq!(config.provider.model, "gpt-4.1");
        assert_eq!(config.server.port, 8080);
        // Blank values are ignored
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|k| (k == "FORM_BUILDER_PORT").then(|| "http".to_string()));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_validate_requires_api_key() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());
        config.provider.api_key = "sk-test".into();
        assert!(config.validate().is_ok());
        config.provider.max_tokens = 0;
        assert!(config.validate().is_err());
    }
}
