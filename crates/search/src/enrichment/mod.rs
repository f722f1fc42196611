//! Result enrichment
//!
//! Turns scored candidates into presentation-ready results: similarity
//! tier, percentage, and optional summary and analysis text.

mod analysis;
mod summarizer;
mod tier;

pub use analysis::{extract_key_points, SimilarityAnalysis, SimilarityAnalyzer, MAX_KEY_POINTS};
pub use summarizer::Summarizer;
pub use tier::{format_percentage, SimilarityTier};

use futures::stream::{self, StreamExt};
use papergraph_common::config::CompletionConfig;
use papergraph_common::llm::CompletionProvider;
use papergraph_common::ScoredCandidate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Summary text when the summarizer could not run at all
pub const SUMMARY_UNAVAILABLE: &str = "summary unavailable";

/// Analysis text when the analyzer could not run at all
pub const ANALYSIS_UNAVAILABLE: &str = "analysis unavailable";

/// A ranked paper ready for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedResult {
    pub paper_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub bibtex: String,
    pub link: Option<String>,

    /// Cosine similarity in [-1, 1]
    pub similarity: f64,
    pub similarity_tier: SimilarityTier,
    pub tier_description: String,
    pub similarity_percentage: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<SimilarityAnalysis>,
}

impl EnrichedResult {
    /// Build a result; tier and percentage both come from `candidate.score`
    pub fn new(
        candidate: ScoredCandidate,
        summary: Option<String>,
        analysis: Option<SimilarityAnalysis>,
    ) -> Self {
        let ScoredCandidate { paper, score } = candidate;
        let tier = SimilarityTier::classify(score);

        Self {
            paper_id: paper.paper_id,
            title: paper.title,
            year: paper.year,
            bibtex: paper.bibtex,
            link: paper.link,
            similarity: score,
            similarity_tier: tier,
            tier_description: tier.description().to_string(),
            similarity_percentage: format_percentage(score),
            summary,
            analysis,
        }
    }
}

/// Per-request enrichment switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichOptions {
    pub summarize: bool,
    pub analyze: bool,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            summarize: true,
            analyze: false,
        }
    }
}

/// Result enricher
#[derive(Clone)]
pub struct ResultEnricher {
    summarizer: Summarizer,
    analyzer: SimilarityAnalyzer,
    concurrency: usize,
}

impl ResultEnricher {
    /// Create an enricher; `concurrency` bounds in-flight enrichments per batch
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        config: &CompletionConfig,
        concurrency: usize,
    ) -> Self {
        Self {
            summarizer: Summarizer::new(provider.clone(), config),
            analyzer: SimilarityAnalyzer::new(provider, config),
            concurrency: concurrency.max(1),
        }
    }

    /// Enrich one candidate. Never fails.
    pub async fn enrich(
        &self,
        candidate: ScoredCandidate,
        query: &str,
        options: EnrichOptions,
    ) -> EnrichedResult {
        let paper = &candidate.paper;

        let summary = if options.summarize {
            let summary = self
                .summarizer
                .summarize(&paper.title, &paper.bibtex, paper.year, query)
                .await
                .unwrap_or_else(|e| {
                    warn!(paper_id = %paper.paper_id, error = %e, "Summary unavailable");
                    SUMMARY_UNAVAILABLE.to_string()
                });
            Some(summary)
        } else {
            None
        };

        let analysis = if options.analyze {
            let analysis = self
                .analyzer
                .analyze(query, paper)
                .await
                .unwrap_or_else(|e| {
                    warn!(paper_id = %paper.paper_id, error = %e, "Analysis unavailable");
                    SimilarityAnalysis {
                        analysis: ANALYSIS_UNAVAILABLE.to_string(),
                        key_points: Vec::new(),
                    }
                });
            Some(analysis)
        } else {
            None
        };

        EnrichedResult::new(candidate, summary, analysis)
    }

    /// Enrich a ranked list, keeping its order
    pub async fn enrich_all(
        &self,
        candidates: Vec<ScoredCandidate>,
        query: &str,
        options: EnrichOptions,
    ) -> Vec<EnrichedResult> {
        stream::iter(candidates)
            .map(|candidate| self.enrich(candidate, query, options))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
