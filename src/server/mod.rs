//! Web server for the policy simplifier.
//!
//! Serves the single-page UI plus two JSON endpoints:
//! - `POST /api/extract-text` turns an uploaded document into text
//! - `POST /api/simplify` turns policy text into a summary with pros and cons
//!
//! Handlers are stateless per request. [`AppState`] only carries the
//! configured extractors and the simplifier.

mod assets;
mod handlers;
mod routes;
mod template_structs;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::analysis::Simplifier;
use crate::config::Config;
use crate::extract::ExtractorRegistry;
use crate::llm::{GeminiClient, TextGenerator};

/// Multipart framing allowance on top of the file size limit.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub extractors: Arc<ExtractorRegistry>,
    pub simplifier: Simplifier,
    pub max_upload_bytes: u64,
}

impl AppState {
    /// Build state backed by the Gemini client.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = GeminiClient::new(config.gemini.clone())?;
        Ok(Self::with_generator(config, Arc::new(client)))
    }

    /// Build state around any text generator.
    pub fn with_generator(config: &Config, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            extractors: Arc::new(ExtractorRegistry::new()),
            simplifier: Simplifier::new(generator)
                .with_failure_policy(config.analysis.on_failure),
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }

    /// Largest request body the router accepts.
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))
            .unwrap_or(usize::MAX)
    }
}

/// Start the web server.
pub async fn serve(config: &Config, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(config)?;
    tracing::info!(
        "Using model {} (failure policy: {})",
        state.simplifier.model_name(),
        state.simplifier.failure_policy()
    );
    let app = create_router(state);

    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
