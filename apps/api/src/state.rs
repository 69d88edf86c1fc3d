use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::cache::ScoreCache;
use crate::extraction::TextExtractor;
use crate::llm_client::LanguageModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable document extractor. Default: `PdfTextExtractor`.
    pub extractor: Arc<dyn TextExtractor>,
    /// Pluggable scoring model. Default: `GeminiClient`.
    pub model: Arc<dyn LanguageModel>,
    pub cache: ScoreCache,
    pub config: Config,
}
