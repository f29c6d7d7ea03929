//! Hosted text generation.
//!
//! [`TextGenerator`] is the seam between the analysis pipeline and the model
//! provider. [`GeminiClient`] implements it against Google's Generative
//! Language API, authenticating with a service-account key.

mod config;
mod credentials;
mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use config::{GeminiConfig, DEFAULT_API_BASE, DEFAULT_CREDENTIALS_ENV, DEFAULT_MODEL};
pub use credentials::{AccessToken, CredentialsError, ServiceAccountKey, GENERATIVE_LANGUAGE_SCOPE};
pub use gemini::{GeminiClient, NO_USABLE_TEXT};

/// Errors that can occur while generating text.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Credentials missing or unusable
    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    /// Failed to connect to the service
    #[error("Connection error: {0}")]
    Connection(String),

    /// Service answered with an error status
    #[error("API error: {0}")]
    Api(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Something that turns a prompt into free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for a single-turn prompt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model that will serve the next request, for logging.
    fn model_name(&self) -> String;
}
