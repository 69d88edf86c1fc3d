// Resume evaluation: text extraction → fingerprint → cache → prompt → model → score.
// All model calls go through the `LanguageModel` trait in llm_client.

pub mod cache;
pub mod fingerprint;
pub mod handlers;
pub mod parser;
pub mod pipeline;
pub mod prompts;
