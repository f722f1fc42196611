//! Graph store layer for PaperGraph
//!
//! Provides:
//! - The [`GraphStore`] trait the search pipeline queries
//! - A Neo4j client over the HTTP transactional API
//! - An in-memory store for tests and local development

mod memory;
mod neo4j;

pub use memory::{GraphFixture, MemoryGraphStore};
pub use neo4j::Neo4jStore;

use crate::config::GraphConfig;
use crate::errors::{AppError, Result};
use crate::models::{ConnectionRecord, ScoredCandidate};
use async_trait::async_trait;
use std::sync::Arc;

/// Maximum neighbors returned by a single lookup
pub const MAX_NEIGHBORS: usize = 10;

/// Read access to the paper graph
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Top `top_k` papers by cosine similarity to `query`, best first.
    /// Papers without an embedding are not candidates.
    async fn find_similar(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredCandidate>>;

    /// Papers one hop away from `paper_id` in either direction, at most
    /// [`MAX_NEIGHBORS`]. Unknown ids yield an empty list.
    async fn neighbors(&self, paper_id: &str) -> Result<Vec<ConnectionRecord>>;

    /// Number of stored papers
    async fn paper_count(&self) -> Result<u64>;

    /// Check connectivity
    async fn ping(&self) -> Result<()>;

    /// Backend name for logs
    fn backend(&self) -> &'static str;
}

/// Create a graph store based on configuration
pub async fn create_graph_store(config: &GraphConfig) -> Result<Arc<dyn GraphStore>> {
    match config.backend.as_str() {
        "neo4j" => Ok(Arc::new(Neo4jStore::new(config)?)),
        "memory" => {
            let store = match &config.seed_file {
                Some(path) => MemoryGraphStore::from_json_file(path).await?,
                None => MemoryGraphStore::new(),
            };
            Ok(Arc::new(store))
        }
        other => Err(AppError::Configuration {
            message: format!("Unknown graph backend: {}", other),
        }),
    }
}
