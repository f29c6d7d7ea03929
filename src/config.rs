//! Configuration management using the prefer crate.
//!
//! A `plainpolicy.{toml,yaml,json}` file is discovered with `prefer` and then
//! parsed with serde. Every key has a default, so a missing file is fine.
//! Environment variables override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::FailurePolicy;
use crate::llm::GeminiConfig;
use crate::upload::DEFAULT_MAX_UPLOAD_BYTES;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config: {message}")]
    Parse { format: &'static str, message: String },

    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (HOST:PORT).
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Largest accepted upload in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Behavior when the model call fails.
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// File this config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Discover and load the config file, falling back to defaults.
    pub async fn load() -> Self {
        match prefer::load("plainpolicy").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config file: {}", e);
                            Self::default_with_env()
                        }
                    }
                } else {
                    Self::default_with_env()
                }
            }
            Err(_) => Self::default_with_env(),
        }
    }

    /// Load from an explicit path when given, otherwise discover.
    pub async fn load_with(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path).await,
            None => Ok(Self::load().await),
        }
    }

    pub fn default_with_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Parse a config file, choosing the format by extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config.with_env_overrides())
    }

    fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `PLAINPOLICY_BIND`
    /// - `PLAINPOLICY_MAX_UPLOAD_BYTES`
    /// - `PLAINPOLICY_ON_FAILURE` (`error` or `fallback`)
    /// - the Gemini overrides, see [`GeminiConfig::with_env_overrides`]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("PLAINPOLICY_BIND") {
            if !val.is_empty() {
                self.server.bind = val;
            }
        }
        if let Ok(val) = std::env::var("PLAINPOLICY_MAX_UPLOAD_BYTES") {
            match val.parse() {
                Ok(n) => self.server.max_upload_bytes = n,
                Err(_) => tracing::warn!("Ignoring invalid PLAINPOLICY_MAX_UPLOAD_BYTES={}", val),
            }
        }
        if let Ok(val) = std::env::var("PLAINPOLICY_ON_FAILURE") {
            match val.parse() {
                Ok(policy) => self.analysis.on_failure = policy,
                Err(e) => tracing::warn!("Ignoring PLAINPOLICY_ON_FAILURE: {}", e),
            }
        }
        self.gemini = self.gemini.with_env_overrides();
        self
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.analysis.on_failure, FailurePolicy::Error);
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::parse(
            r#"
[server]
bind = "0.0.0.0:8080"

[analysis]
on_failure = "fallback"
"#,
            "toml",
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.analysis.on_failure, FailurePolicy::Fallback);
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let yaml = Config::parse("gemini:\n  model: gemini-1.5-pro\n", "yaml").unwrap();
        assert_eq!(yaml.gemini.model, "gemini-1.5-pro");

        let json = Config::parse(r#"{"server": {"max_upload_bytes": 1024}}"#, "json").unwrap();
        assert_eq!(json.server.max_upload_bytes, 1024);
    }

    #[test]
    fn test_parse_errors() {
        let err = Config::parse("[server\n", "toml").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse TOML config"));

        let err = Config::parse(r#"{"analysis": {"on_failure": "retry"}}"#, "json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "JSON", .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.analysis.on_failure = FailurePolicy::Fallback;
        let text = config.to_toml().unwrap();
        assert!(text.contains("on_failure = \"fallback\""));
        assert_eq!(Config::parse(&text, "toml").unwrap(), config);
    }

    #[tokio::test]
    async fn test_load_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plainpolicy.toml");
        std::fs::write(&path, "[gemini]\ntimeout_secs = 30\n").unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.source_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.server.bind, DEFAULT_BIND);
    }

    #[tokio::test]
    async fn test_load_missing_explicit_path() {
        let dir = TempDir::new().unwrap();
        let err = Config::load_with(Some(&dir.path().join("nope.toml")))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
