//! Candidate retrieval
//!
//! Provides two retrieval modes:
//! - Vector search (cosine similarity of query and paper embeddings)
//! - Hybrid search, currently an alias of vector search

mod hybrid;
mod vector;

pub use hybrid::HybridRetriever;
pub use vector::VectorRetriever;

use papergraph_common::errors::{AppError, Result};
use papergraph_common::ScoredCandidate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Retrieval mode
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    /// Vector similarity search
    #[default]
    Vector,
    /// Hybrid search
    Hybrid,
}

impl RetrievalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalMode::Vector => "vector",
            RetrievalMode::Hybrid => "hybrid",
        }
    }
}

impl FromStr for RetrievalMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vector" => Ok(RetrievalMode::Vector),
            "hybrid" => Ok(RetrievalMode::Hybrid),
            other => Err(AppError::validation(
                "mode",
                format!("Unknown search mode: {}", other),
            )),
        }
    }
}

/// Common trait for all retrievers
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// Best `top_k` candidates for the query, highest score first
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ScoredCandidate>>;

    /// Get the retrieval mode
    fn mode(&self) -> RetrievalMode;
}
