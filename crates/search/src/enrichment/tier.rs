//! Similarity tiers

use serde::{Deserialize, Serialize};

/// Discrete relevance level of a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimilarityTier {
    #[serde(rename = "very high similarity")]
    VeryHigh,
    #[serde(rename = "high similarity")]
    High,
    #[serde(rename = "moderate similarity")]
    Moderate,
    #[serde(rename = "low similarity")]
    Low,
    #[serde(rename = "minimal similarity")]
    Minimal,
}

impl SimilarityTier {
    /// Classify a score. Lower bounds are inclusive.
    pub fn classify(score: f64) -> Self {
        if score >= 0.9 {
            SimilarityTier::VeryHigh
        } else if score >= 0.7 {
            SimilarityTier::High
        } else if score >= 0.5 {
            SimilarityTier::Moderate
        } else if score >= 0.3 {
            SimilarityTier::Low
        } else {
            SimilarityTier::Minimal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SimilarityTier::VeryHigh => "very high similarity",
            SimilarityTier::High => "high similarity",
            SimilarityTier::Moderate => "moderate similarity",
            SimilarityTier::Low => "low similarity",
            SimilarityTier::Minimal => "minimal similarity",
        }
    }

    /// One-line reading of the tier for display
    pub fn description(&self) -> &'static str {
        match self {
            SimilarityTier::VeryHigh => "near-complete match with the query topic",
            SimilarityTier::High => "topic is directly related to the query",
            SimilarityTier::Moderate => "topic partially matches the query",
            SimilarityTier::Low => "indirect connection to the query topic",
            SimilarityTier::Minimal => "weak connection to the query",
        }
    }
}

/// Score as a percentage with one decimal, e.g. 0.6789 -> "67.9%"
pub fn format_percentage(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}
