//! Hybrid retrieval
//!
//! There is no lexical index behind the graph store, so hybrid search
//! returns exactly what vector search returns. The mode stays separate so
//! callers and metrics keep the distinction.

use super::{vector::VectorRetriever, RetrievalMode, Retriever};
use papergraph_common::errors::Result;
use papergraph_common::ScoredCandidate;

/// Hybrid retriever
#[derive(Clone)]
pub struct HybridRetriever {
    vector: VectorRetriever,
}

impl HybridRetriever {
    /// Create a new hybrid retriever
    pub fn new(vector: VectorRetriever) -> Self {
        Self { vector }
    }
}

#[async_trait::async_trait]
impl Retriever for HybridRetriever {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ScoredCandidate>> {
        self.vector.retrieve(query, top_k).await
    }

    fn mode(&self) -> RetrievalMode {
        RetrievalMode::Hybrid
    }
}
