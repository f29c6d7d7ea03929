//! Policy simplification.
//!
//! [`Simplifier`] ties the prompt template, a [`TextGenerator`] and the reply
//! parser together. What happens when generation fails is decided by
//! [`FailurePolicy`].

mod parse;
mod prompt;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::{LlmError, TextGenerator};

pub use parse::{
    clean_markdown, extract_list_items, parse_response, SimplificationResult, CONS_NOT_AVAILABLE,
    FALLBACK_CON, FALLBACK_PRO, FALLBACK_SUMMARY, MAX_ITEMS, PROS_NOT_AVAILABLE,
    SUMMARY_NOT_AVAILABLE,
};
pub use prompt::build_prompt;

/// Message returned for blank input.
pub const TEXT_REQUIRED_MESSAGE: &str = "Policy text is required";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),
}

/// What to return when the model call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Surface the failure to the caller.
    #[default]
    Error,
    /// Answer with [`SimplificationResult::fallback`].
    Fallback,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Error => write!(f, "error"),
            FailurePolicy::Fallback => write!(f, "fallback"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(FailurePolicy::Error),
            "fallback" => Ok(FailurePolicy::Fallback),
            other => Err(format!(
                "unknown failure policy '{}' (expected 'error' or 'fallback')",
                other
            )),
        }
    }
}

/// Reject text that is empty or only whitespace.
pub fn validate_text(text: &str) -> Result<(), AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::InvalidInput(TEXT_REQUIRED_MESSAGE.to_string()));
    }
    Ok(())
}

/// Produces plain-language summaries of policy text.
#[derive(Clone)]
pub struct Simplifier {
    generator: Arc<dyn TextGenerator>,
    on_failure: FailurePolicy,
}

impl Simplifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            on_failure: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.on_failure
    }

    pub fn model_name(&self) -> String {
        self.generator.model_name()
    }

    /// Summarize `text`. Blank text is rejected before the model is called.
    pub async fn simplify(&self, text: &str) -> Result<SimplificationResult, AnalysisError> {
        validate_text(text)?;

        let prompt = build_prompt(text);
        match self.generator.generate(&prompt).await {
            Ok(reply) => {
                let result = parse_response(&reply);
                tracing::info!(
                    "Simplified {} chars of policy text into {} pros and {} cons",
                    text.chars().count(),
                    result.pros.len(),
                    result.cons.len()
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!("Policy analysis failed: {}", e);
                match self.on_failure {
                    FailurePolicy::Error => Err(AnalysisError::Generation(e)),
                    FailurePolicy::Fallback => Ok(SimplificationResult::fallback()),
                }
            }
        }
    }
}
