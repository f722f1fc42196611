//! Similarity analysis
//!
//! Longer explanation of how a paper relates to a query, with the list
//! items of the answer pulled out as key points.

use papergraph_common::config::CompletionConfig;
use papergraph_common::errors::{AppError, Result};
use papergraph_common::llm::{ChatMessage, CompletionProvider, CompletionRequest};
use papergraph_common::PaperRecord;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// Maximum number of key points kept from an analysis
pub const MAX_KEY_POINTS: usize = 5;

/// Key points shorter than this are list noise
const MIN_KEY_POINT_CHARS: usize = 10;

const SYSTEM_PROMPT: &str =
    "You are an expert in scientific literature analysis. Give a structured, well-reasoned analysis.";

/// Free-text analysis with extracted key points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityAnalysis {
    pub analysis: String,
    pub key_points: Vec<String>,
}

impl SimilarityAnalysis {
    /// Analysis returned when the provider does not answer
    pub fn provider_unavailable() -> Self {
        Self {
            analysis: "semantic analysis unavailable".to_string(),
            key_points: vec!["analysis temporarily unavailable".to_string()],
        }
    }
}

/// Similarity analyzer
#[derive(Clone)]
pub struct SimilarityAnalyzer {
    provider: Arc<dyn CompletionProvider>,
    max_tokens: u32,
    temperature: f32,
}

impl SimilarityAnalyzer {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &CompletionConfig) -> Self {
        Self {
            provider,
            max_tokens: config.analysis_max_tokens,
            temperature: config.analysis_temperature,
        }
    }

    /// Analyze why `paper` matches `query`
    pub async fn analyze(&self, query: &str, paper: &PaperRecord) -> Result<SimilarityAnalysis> {
        let request = CompletionRequest {
            kind: "analysis",
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(query, paper)),
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        match self.provider.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => {
                let analysis = text.trim().to_string();
                let key_points = extract_key_points(&analysis);
                Ok(SimilarityAnalysis { analysis, key_points })
            }
            Ok(_) => {
                warn!(paper_id = %paper.paper_id, "Empty analysis from completion provider");
                Ok(SimilarityAnalysis::provider_unavailable())
            }
            Err(e @ AppError::MissingCredential { .. }) => Err(e),
            Err(e) => {
                warn!(paper_id = %paper.paper_id, error = %e, "Similarity analysis failed");
                Ok(SimilarityAnalysis::provider_unavailable())
            }
        }
    }
}

fn build_prompt(query: &str, paper: &PaperRecord) -> String {
    let year = paper
        .year
        .map_or_else(|| "unknown".to_string(), |y| y.to_string());
    format!(
        "Analyze how the following paper relates to the search query.\n\n\
        Search query: \"{query}\"\n\
        Paper: \"{title}\" ({year})\n\
        Citation: {bibtex}\n\n\
        Cover, as a bulleted list:\n\
        - the main points of contact with the query\n\
        - key differences or complementary aspects\n\
        - the practical significance for the researcher",
        title = paper.title,
        bibtex = paper.bibtex,
    )
}

fn list_item_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[-•—*]|[0-9]+[.)])\s+(.*)$").expect("list item pattern is valid")
    })
}

/// Pull list items out of an analysis.
///
/// Returns at most [`MAX_KEY_POINTS`] items longer than ten characters,
/// or a single placeholder when the text has no list.
pub fn extract_key_points(text: &str) -> Vec<String> {
    let pattern = list_item_pattern();

    let points: Vec<String> = text
        .lines()
        .filter_map(|line| {
            let captures = pattern.captures(line.trim())?;
            let item = captures.get(1)?.as_str().trim();
            (item.chars().count() > MIN_KEY_POINT_CHARS).then(|| item.to_string())
        })
        .take(MAX_KEY_POINTS)
        .collect();

    if points.is_empty() {
        vec!["no key points identified".to_string()]
    } else {
        points
    }
}
