//! Google service-account credentials.
//!
//! The key arrives as a base64-encoded JSON blob in the environment. It is
//! turned into an OAuth access token with the JWT bearer flow: sign a short
//! lived assertion with the key's RSA private key, then trade it at the key's
//! `token_uri`.

use std::fmt;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OAuth scope for the Generative Language API.
pub const GENERATIVE_LANGUAGE_SCOPE: &str = "https://www.googleapis.com/auth/generative-language";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

const LENIENT_CONFIG: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT_CONFIG);
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT_CONFIG);

/// Errors loading credentials or trading them for a token.
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Missing {0} environment variable")]
    Missing(String),

    #[error("Credential blob is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Credential blob is not valid UTF-8")]
    Utf8,

    #[error("Credential blob is not a service-account key: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported credential type: {0}")]
    UnsupportedType(String),

    #[error("Failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Token exchange failed: {0}")]
    Exchange(String),
}

/// A Google service-account key file.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    token_type: Option<String>,
}

/// A bearer token for API calls.
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub token_type: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl AccessToken {
    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}

impl ServiceAccountKey {
    /// Read and decode the key from an environment variable.
    pub fn from_env(var: &str) -> Result<Self, CredentialsError> {
        let blob = std::env::var(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| CredentialsError::Missing(var.to_string()))?;
        Self::from_base64(&blob)
    }

    /// Decode a base64 key blob. Whitespace and missing padding are tolerated,
    /// as is the URL-safe alphabet.
    pub fn from_base64(blob: &str) -> Result<Self, CredentialsError> {
        let compact: String = blob.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = match LENIENT_STANDARD.decode(&compact) {
            Ok(bytes) => bytes,
            Err(standard_err) => LENIENT_URL_SAFE
                .decode(&compact)
                .map_err(|_| standard_err)?,
        };
        let json = String::from_utf8(bytes).map_err(|_| CredentialsError::Utf8)?;
        Self::from_json(&json)
    }

    /// Parse a key from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, CredentialsError> {
        let key: Self = serde_json::from_str(json)?;
        if key.key_type != "service_account" {
            return Err(CredentialsError::UnsupportedType(key.key_type));
        }
        Ok(key)
    }

    /// Build the signed JWT assertion for `scope`, issued at `now`.
    pub fn signed_assertion(
        &self,
        scope: &str,
        now: DateTime<Utc>,
    ) -> Result<String, CredentialsError> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: scope.to_string(),
            aud: self.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(&header, &claims, &key)?)
    }

    /// Exchange a fresh assertion for an access token.
    pub async fn fetch_token(
        &self,
        http: &Client,
        scope: &str,
    ) -> Result<AccessToken, CredentialsError> {
        let now = Utc::now();
        let assertion = self.signed_assertion(scope, now)?;

        let resp = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await
            .map_err(|e| CredentialsError::Exchange(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CredentialsError::Exchange(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| CredentialsError::Exchange(format!("bad token response: {}", e)))?;

        tracing::debug!(
            "Obtained access token for {} (expires in {:?}s)",
            self.client_email,
            token.expires_in
        );

        Ok(AccessToken {
            token: token.access_token,
            token_type: token.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_at: token.expires_in.map(|secs| now + Duration::seconds(secs)),
        })
    }
}
