//! Test doubles for the extractor and model seams.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Config;
use crate::evaluation::cache::ScoreCache;
use crate::extraction::{ExtractionError, TextExtractor};
use crate::llm_client::{LanguageModel, LlmError};
use crate::state::AppState;

/// Treats the upload as UTF-8 text. Bytes starting with `%BROKEN` fail extraction.
pub struct Utf8Extractor;

#[async_trait]
impl TextExtractor for Utf8Extractor {
    async fn extract_text(&self, document: &[u8]) -> Result<String, ExtractionError> {
        if document.starts_with(b"%BROKEN") {
            return Err(ExtractionError::Pdf("invalid file header".to_string()));
        }
        Ok(String::from_utf8_lossy(document).into_owned())
    }
}

/// Replays scripted replies in order and records every prompt it receives.
/// Once the script runs out, the last reply repeats.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    last: Mutex<Option<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16, message: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([Err(LlmError::Api {
                status,
                message: message.to_string(),
            })])),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(reply)) => {
                *self.last.lock().unwrap() = Some(reply.clone());
                Ok(reply)
            }
            Some(Err(e)) => Err(e),
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .ok_or(LlmError::EmptyContent),
        }
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "GEMINI_API_KEY" => Some("test-key".to_string()),
        "MAX_UPLOAD_BYTES" => Some("65536".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn test_state(model: Arc<ScriptedModel>) -> AppState {
    AppState {
        extractor: Arc::new(Utf8Extractor),
        model,
        cache: ScoreCache::new(),
        config: test_config(),
    }
}
