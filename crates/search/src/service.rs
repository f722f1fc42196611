//! Search pipeline
//!
//! Entry points used by the gateway: ranked search, graph connections,
//! and corpus statistics.

use crate::enrichment::{EnrichOptions, EnrichedResult, ResultEnricher};
use crate::retrieval::{HybridRetriever, RetrievalMode, Retriever, VectorRetriever};
use papergraph_common::config::SearchConfig;
use papergraph_common::embeddings::create_embedder;
use papergraph_common::errors::{AppError, Result};
use papergraph_common::graph::create_graph_store;
use papergraph_common::llm::MistralChatClient;
use papergraph_common::metrics::record_search;
use papergraph_common::{
    AppConfig, CompletionProvider, ConnectionRecord, DatabaseStats, Embedder, GraphStore,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Full search request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,

    /// Number of results; the configured default when absent
    #[serde(default)]
    pub top_k: Option<usize>,

    #[serde(default)]
    pub mode: RetrievalMode,

    /// Generate summaries; the configured default when absent
    #[serde(default)]
    pub summarize: Option<bool>,

    #[serde(default)]
    pub analyze: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

/// Results of one search with timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub search_id: Uuid,
    pub query: String,
    pub mode: RetrievalMode,
    pub results: Vec<EnrichedResult>,
    pub processing_time_ms: u64,
}

/// Semantic search service
#[derive(Clone)]
pub struct SearchService {
    vector: VectorRetriever,
    hybrid: HybridRetriever,
    store: Arc<dyn GraphStore>,
    enricher: ResultEnricher,
    settings: SearchConfig,
}

impl SearchService {
    /// Assemble the pipeline from its providers
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn GraphStore>,
        completion: Arc<dyn CompletionProvider>,
        config: &AppConfig,
    ) -> Self {
        let vector = VectorRetriever::new(embedder, store.clone());

        Self {
            hybrid: HybridRetriever::new(vector.clone()),
            vector,
            store,
            enricher: ResultEnricher::new(
                completion,
                &config.completion,
                config.search.enrichment_concurrency,
            ),
            settings: config.search.clone(),
        }
    }

    /// Build the providers named in `config` and assemble the pipeline
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let embedder = create_embedder(&config.embedding)?;
        let completion: Arc<dyn CompletionProvider> =
            Arc::new(MistralChatClient::new(&config.completion)?);
        let store = create_graph_store(&config.graph).await?;

        info!(
            embedding_model = embedder.model_name(),
            completion_model = completion.model_name(),
            graph_backend = store.backend(),
            "Search service initialized"
        );

        Ok(Self::new(embedder, store, completion, config))
    }

    /// Vector search with the configured enrichment defaults
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<EnrichedResult>> {
        let request = SearchRequest {
            top_k: Some(top_k),
            ..SearchRequest::new(query)
        };
        Ok(self.search_with(&request).await?.results)
    }

    /// Run a full search request
    #[instrument(skip(self, request), fields(mode = request.mode.as_str(), top_k = tracing::field::Empty))]
    pub async fn search_with(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        let start = Instant::now();
        let top_k = self.resolve_top_k(request.top_k)?;
        tracing::Span::current().record("top_k", top_k as u64);

        let retriever: &dyn Retriever = match request.mode {
            RetrievalMode::Vector => &self.vector,
            RetrievalMode::Hybrid => &self.hybrid,
        };

        let candidates = match retriever.retrieve(&request.query, top_k).await {
            Ok(candidates) => candidates,
            Err(e @ AppError::MissingCredential { .. }) => return Err(e),
            Err(e) => {
                warn!(error = %e, "Candidate retrieval failed, returning no results");
                Vec::new()
            }
        };

        let options = EnrichOptions {
            summarize: request.summarize.unwrap_or(self.settings.summarize),
            analyze: request.analyze,
        };
        let results = self
            .enricher
            .enrich_all(candidates, &request.query, options)
            .await;

        let elapsed = start.elapsed();
        record_search(elapsed.as_secs_f64(), retriever.mode().as_str(), results.len());

        info!(
            results = results.len(),
            duration_ms = elapsed.as_millis() as u64,
            "Search completed"
        );

        Ok(SearchOutcome {
            search_id: Uuid::new_v4(),
            query: request.query.clone(),
            mode: retriever.mode(),
            results,
            processing_time_ms: elapsed.as_millis() as u64,
        })
    }

    /// Papers directly connected to `paper_id`; empty on unknown id or store failure
    #[instrument(skip(self))]
    pub async fn connections(&self, paper_id: &str) -> Vec<ConnectionRecord> {
        match self.store.neighbors(paper_id).await {
            Ok(connections) => connections,
            Err(e) => {
                warn!(error = %e, "Connection lookup failed");
                Vec::new()
            }
        }
    }

    /// Corpus statistics; zero papers on store failure
    pub async fn stats(&self) -> DatabaseStats {
        let paper_count = self.store.paper_count().await.unwrap_or_else(|e| {
            warn!(error = %e, "Paper count failed");
            0
        });
        DatabaseStats { paper_count }
    }

    /// Check that the graph store answers
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    pub fn graph_backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Validate a requested result count
    pub fn resolve_top_k(&self, requested: Option<usize>) -> Result<usize> {
        let top_k = requested.unwrap_or(self.settings.default_top_k);
        if top_k == 0 || top_k > self.settings.max_top_k {
            return Err(AppError::validation(
                "top_k",
                format!("top_k must be between 1 and {}", self.settings.max_top_k),
            ));
        }
        Ok(top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingStore, ScriptedProvider};
    use papergraph_common::embeddings::HashingEmbedder;
    use papergraph_common::graph::MemoryGraphStore;
    use papergraph_common::{PaperRecord, RelationKind};

    const DIM: usize = 64;

    async fn memory_service() -> SearchService {
        let embedder = Arc::new(HashingEmbedder::new(DIM));
        let store = Arc::new(MemoryGraphStore::new());
        for (id, title) in [
            ("gnn", "graph neural networks"),
            ("gat", "graph attention networks"),
            ("bert", "pretrained language transformers"),
        ] {
            store
                .add_paper(
                    PaperRecord::new(id, title)
                        .with_year(2019)
                        .with_embedding(embedder.vector_for(title)),
                )
                .await;
        }
        store.add_edge("gat", "gnn", RelationKind::Cites).await;

        SearchService::new(
            embedder,
            store,
            Arc::new(ScriptedProvider::reply("summary text")),
            &AppConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_search_ranks_and_enriches() {
        let service = memory_service().await;

        let results = service.search("graph neural networks", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].paper_id, "gnn");
        assert_eq!(results[0].similarity_percentage, "100.0%");
        assert_eq!(results[0].summary.as_deref(), Some("summary text"));
        assert!(results[0].similarity >= results[1].similarity);
    }

    #[tokio::test]
    async fn test_top_k_bounds() {
        let service = memory_service().await;

        assert!(matches!(
            service.search("graph", 0).await,
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            service.search("graph", 21).await,
            Err(AppError::Validation { .. })
        ));
        assert_eq!(service.resolve_top_k(None).unwrap(), 10);
        assert_eq!(service.resolve_top_k(Some(20)).unwrap(), 20);
    }

    #[tokio::test]
    async fn test_hybrid_matches_vector() {
        let service = memory_service().await;
        let vector = SearchRequest {
            top_k: Some(3),
            summarize: Some(false),
            ..SearchRequest::new("graph attention")
        };
        let hybrid = SearchRequest {
            mode: RetrievalMode::Hybrid,
            ..vector.clone()
        };

        let a = service.search_with(&vector).await.unwrap();
        let b = service.search_with(&hybrid).await.unwrap();

        assert_eq!(b.mode, RetrievalMode::Hybrid);
        let ids = |o: &SearchOutcome| {
            o.results
                .iter()
                .map(|r| (r.paper_id.clone(), r.similarity))
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&a), ids(&b));
        assert!(a.results.iter().all(|r| r.summary.is_none()));
    }

    #[tokio::test]
    async fn test_store_failure_degrades() {
        let service = SearchService::new(
            Arc::new(HashingEmbedder::new(DIM)),
            Arc::new(FailingStore),
            Arc::new(ScriptedProvider::reply("unused")),
            &AppConfig::default(),
        );

        assert!(service.search("graph", 5).await.unwrap().is_empty());
        assert!(service.connections("gnn").await.is_empty());
        assert_eq!(service.stats().await.paper_count, 0);
        assert!(service.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_connections_and_stats() {
        let service = memory_service().await;

        let connections = service.connections("gnn").await;
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].paper_id, "gat");
        assert_eq!(connections[0].connection_type, "cites");

        assert!(service.connections("unknown").await.is_empty());
        assert_eq!(service.stats().await.paper_count, 3);
        tokio_test::assert_ok!(service.ping().await);
    }
}
