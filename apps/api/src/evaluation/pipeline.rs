//! The evaluation pipeline: extract → fingerprint → cache lookup → score → cache store.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::evaluation::fingerprint::fingerprint;
use crate::evaluation::parser::{extract_match_score, MatchScore};
use crate::evaluation::prompts::{build_match_prompt, strict_recruiter_prompt};
use crate::llm_client::{LanguageModel, LlmError};
use crate::state::AppState;

/// A first score of exactly this value is treated as a placeholder answer and re-queried once.
pub const RETRY_SENTINEL: f64 = 60.0;

/// The response body of `POST /evaluate`, and the value stored in the score cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(rename = "Final_ATS_Score_Percentage")]
    pub final_ats_score_percentage: String,
}

impl From<MatchScore> for EvaluationResult {
    fn from(score: MatchScore) -> Self {
        Self {
            final_ats_score_percentage: score.as_percentage(),
        }
    }
}

/// Scores a resume document against a job description, serving repeats from the cache.
pub async fn evaluate_resume(
    state: &AppState,
    document: &[u8],
    job_description: &str,
) -> Result<EvaluationResult, AppError> {
    let resume_text = state.extractor.extract_text(document).await?;
    let key = fingerprint(&resume_text, job_description);

    if let Some(cached) = state.cache.get(&key).await {
        info!(fingerprint = %key, "Score cache hit");
        return Ok(cached);
    }
    info!(fingerprint = %key, "Score cache miss");

    let score = score_match(state.model.as_ref(), &resume_text, job_description).await?;
    info!(
        score = score.value(),
        defaulted = matches!(score, MatchScore::Defaulted),
        "Resume scored"
    );
    let result = EvaluationResult::from(score);

    state.cache.insert(key, result.clone()).await;
    Ok(result)
}

/// Asks the model for a match score, re-asking once with a stricter persona on the sentinel.
///
/// The second answer is final whatever it is, so this makes at most two model calls.
pub async fn score_match(
    model: &dyn LanguageModel,
    resume_text: &str,
    job_description: &str,
) -> Result<MatchScore, LlmError> {
    let prompt = build_match_prompt(resume_text, job_description);
    let score = extract_match_score(&model.generate(&prompt).await?);

    if score != MatchScore::Parsed(RETRY_SENTINEL) {
        return Ok(score);
    }

    warn!("Model returned sentinel score {RETRY_SENTINEL}, retrying with strict recruiter prompt");
    let retry = model.generate(&strict_recruiter_prompt(&prompt)).await?;
    Ok(extract_match_score(&retry))
}
