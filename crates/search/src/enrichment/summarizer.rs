//! Paper summaries
//!
//! Asks the completion provider for a short description of a paper in
//! the context of the user's query.

use papergraph_common::config::CompletionConfig;
use papergraph_common::errors::{AppError, Result};
use papergraph_common::llm::{ChatMessage, CompletionProvider, CompletionRequest};
use std::sync::Arc;
use tracing::warn;

const SYSTEM_PROMPT: &str =
    "You are an assistant that explains scientific papers. Answer concisely and precisely.";

/// Summary generator
#[derive(Clone)]
pub struct Summarizer {
    provider: Arc<dyn CompletionProvider>,
    max_tokens: u32,
    temperature: f32,
}

impl Summarizer {
    /// Create a summarizer with token and temperature limits from config
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &CompletionConfig) -> Self {
        Self {
            provider,
            max_tokens: config.summary_max_tokens,
            temperature: config.summary_temperature,
        }
    }

    /// Summarize a paper for a query.
    ///
    /// Provider failures and empty completions produce [`fallback`].
    /// Only a missing API key is returned as an error.
    pub async fn summarize(
        &self,
        title: &str,
        bibtex: &str,
        year: Option<i32>,
        query: &str,
    ) -> Result<String> {
        let request = CompletionRequest {
            kind: "summary",
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(title, bibtex, year, query)),
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        match self.provider.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            Ok(_) => {
                warn!(title, "Empty summary from completion provider");
                Ok(fallback(title, year))
            }
            Err(e @ AppError::MissingCredential { .. }) => Err(e),
            Err(e) => {
                warn!(title, error = %e, "Summary generation failed, using fallback");
                Ok(fallback(title, year))
            }
        }
    }
}

fn build_prompt(title: &str, bibtex: &str, year: Option<i32>, query: &str) -> String {
    let year = year.map_or_else(|| "unknown".to_string(), |y| y.to_string());
    format!(
        "Describe the following scientific paper in 2-3 sentences and explain how it relates \
        to the search query.\n\n\
        Search query: {query}\n\
        Title: {title}\n\
        Year: {year}\n\
        Citation: {bibtex}\n\n\
        Focus on the main contribution and its relevance to the query."
    )
}

/// Deterministic summary used when the provider cannot answer
pub fn fallback(title: &str, year: Option<i32>) -> String {
    let title = if title.trim().is_empty() { "Untitled" } else { title };
    let year = year.map_or_else(|| "year unknown".to_string(), |y| y.to_string());
    format!("Paper: {title} ({year}). Its relevance to the query needs further analysis.")
}
