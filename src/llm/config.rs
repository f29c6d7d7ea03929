//! Gemini client configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1";
pub const DEFAULT_CREDENTIALS_ENV: &str = "GOOGLE_CREDENTIALS_BASE64";

/// Configuration for the Gemini client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model used when `GEMINI_MODEL` is not set at request time
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL, without the `/models/...` suffix
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Environment variable holding the base64 service-account key
    #[serde(default = "default_credentials_env")]
    pub credentials_env: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_credentials_env() -> String {
    DEFAULT_CREDENTIALS_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            credentials_env: default_credentials_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeminiConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `GEMINI_API_BASE`: API base URL
    /// - `GEMINI_TIMEOUT_SECS`: request timeout
    ///
    /// `GEMINI_MODEL` is deliberately not applied here; it is read on every
    /// request by [`GeminiConfig::resolve_model`].
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("GEMINI_API_BASE") {
            if !val.is_empty() {
                self.api_base = val;
            }
        }
        if let Ok(val) = std::env::var("GEMINI_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = n;
            }
        }
        self
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_credentials_env(mut self, name: &str) -> Self {
        self.credentials_env = name.to_string();
        self
    }

    /// Model for the current request: `GEMINI_MODEL` if set, else the configured one.
    pub fn resolve_model(&self) -> String {
        std::env::var("GEMINI_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.model.clone())
    }

    /// URL of the `generateContent` method for a model.
    pub fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model
        )
    }
}
