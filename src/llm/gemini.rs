//! Google Gemini text generation over the REST API.
//!
//! Every call reads the service-account key from the environment, exchanges
//! it for a fresh access token and sends a single-turn `generateContent`
//! request. The model is resolved per call so `GEMINI_MODEL` can change
//! without a restart.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::config::GeminiConfig;
use super::credentials::{ServiceAccountKey, GENERATIVE_LANGUAGE_SCOPE};
use super::{LlmError, TextGenerator};

/// Substituted when a response carries no text part.
pub const NO_USABLE_TEXT: &str = "Gemini API returned no usable text";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, if any.
    fn first_text(self) -> Option<String> {
        self.candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.is_empty())
    }
}

/// Gemini client authenticated with a service-account key.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Connection(e.to_string()))?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let key = ServiceAccountKey::from_env(&self.config.credentials_env)?;
        let token = key
            .fetch_token(&self.http, GENERATIVE_LANGUAGE_SCOPE)
            .await?;

        let model = self.config.resolve_model();
        let url = self.config.generate_url(&model);
        tracing::info!("Sending prompt to Gemini model {}", model);

        let request = GenerateRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, token.authorization())
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(format!("Failed to connect to {}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API returned {}: {}", status, body);
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse response: {}", e)))?;

        if let Some(error) = &body.error {
            return Err(LlmError::Api(error.message.clone()));
        }

        match body.first_text() {
            Some(text) => {
                tracing::debug!("Gemini returned {} chars", text.len());
                Ok(text)
            }
            None => {
                tracing::warn!("Gemini response had no text part");
                Ok(NO_USABLE_TEXT.to_string())
            }
        }
    }

    fn model_name(&self) -> String {
        self.config.resolve_model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn test_first_text() {
        let resp = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"SUMMARY: ok"},{"text":"more"}]}},
                {"content":{"parts":[{"text":"second"}]}}]}"#,
        );
        assert_eq!(resp.first_text().as_deref(), Some("SUMMARY: ok"));
    }

    #[test]
    fn test_first_text_missing() {
        assert_eq!(parse(r#"{}"#).first_text(), None);
        assert_eq!(parse(r#"{"candidates":[]}"#).first_text(), None);
        assert_eq!(parse(r#"{"candidates":[{}]}"#).first_text(), None);
        assert_eq!(
            parse(r#"{"candidates":[{"content":{"parts":[]}}]}"#).first_text(),
            None
        );
        assert_eq!(
            parse(r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#).first_text(),
            None
        );
    }

    #[tokio::test]
    async fn test_generate_without_credentials() {
        let client = GeminiClient::new(
            GeminiConfig::default().with_credentials_env("PLAINPOLICY_TEST_NO_GEMINI_KEY"),
        )
        .unwrap();
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::Credentials(_)));
    }
}
