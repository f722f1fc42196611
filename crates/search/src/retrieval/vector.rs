//! Vector similarity retrieval
//!
//! Embeds the query, then asks the graph store for the closest papers.

use super::{RetrievalMode, Retriever};
use papergraph_common::errors::Result;
use papergraph_common::{Embedder, GraphStore, ScoredCandidate};
use std::sync::Arc;
use tracing::debug;

/// Vector retriever
#[derive(Clone)]
pub struct VectorRetriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn GraphStore>,
}

impl VectorRetriever {
    /// Create a new vector retriever
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn GraphStore>) -> Self {
        Self { embedder, store }
    }
}

#[async_trait::async_trait]
impl Retriever for VectorRetriever {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ScoredCandidate>> {
        let embedding = self.embedder.embed(query).await?;

        debug!(
            model = self.embedder.model_name(),
            dimension = embedding.len(),
            backend = self.store.backend(),
            top_k,
            "Query embedded, ranking candidates"
        );

        self.store.find_similar(&embedding, top_k).await
    }

    fn mode(&self) -> RetrievalMode {
        RetrievalMode::Vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papergraph_common::embeddings::HashingEmbedder;
    use papergraph_common::graph::MemoryGraphStore;
    use papergraph_common::PaperRecord;

    #[tokio::test]
    async fn test_retrieves_closest_papers() {
        let embedder = Arc::new(HashingEmbedder::new(128));
        let store = Arc::new(MemoryGraphStore::new());
        store
            .add_paper(
                PaperRecord::new("gnn", "Graph Neural Networks")
                    .with_embedding(embedder.vector_for("graph neural networks")),
            )
            .await;
        store
            .add_paper(
                PaperRecord::new("cnn", "Convolutional Image Models")
                    .with_embedding(embedder.vector_for("convolutional image models")),
            )
            .await;

        let retriever = VectorRetriever::new(embedder, store);
        let results = retriever.retrieve("graph neural networks", 1).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].paper.paper_id, "gnn");
        assert!((results[0].score - 1.0).abs() < 1e-9);
    }
}
