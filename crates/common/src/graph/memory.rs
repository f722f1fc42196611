//! In-memory graph store
//!
//! Holds papers and typed edges in process. Similarity goes through the same
//! scorer the pipeline documents, which makes this store the reference
//! behavior for tests.

use super::{GraphStore, MAX_NEIGHBORS};
use crate::errors::{AppError, Result};
use crate::models::{ConnectionRecord, PaperRecord, RelationKind, ScoredCandidate};
use crate::similarity::score_and_rank;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Directed edge between two papers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureEdge {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
}

/// Serialized corpus accepted by [`MemoryGraphStore::from_json_file`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFixture {
    #[serde(default)]
    pub papers: Vec<PaperRecord>,
    #[serde(default)]
    pub edges: Vec<FixtureEdge>,
}

#[derive(Default)]
struct GraphData {
    papers: Vec<PaperRecord>,
    edges: Vec<FixtureEdge>,
}

/// In-memory graph
#[derive(Default)]
pub struct MemoryGraphStore {
    data: RwLock<GraphData>,
}

impl MemoryGraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a fixture
    pub fn from_fixture(fixture: GraphFixture) -> Self {
        Self {
            data: RwLock::new(GraphData {
                papers: fixture.papers,
                edges: fixture.edges,
            }),
        }
    }

    /// Load a fixture from a JSON file
    pub async fn from_json_file(path: &str) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to read graph fixture {}: {}", path, e),
            })?;
        let fixture: GraphFixture = serde_json::from_str(&raw)?;

        tracing::info!(
            path,
            papers = fixture.papers.len(),
            edges = fixture.edges.len(),
            "Loaded graph fixture"
        );

        Ok(Self::from_fixture(fixture))
    }

    /// Insert or replace a paper
    pub async fn add_paper(&self, paper: PaperRecord) {
        let mut data = self.data.write().await;
        match data.papers.iter().position(|p| p.paper_id == paper.paper_id) {
            Some(index) => data.papers[index] = paper,
            None => data.papers.push(paper),
        }
    }

    /// Add a directed edge `from -[kind]-> to`
    pub async fn add_edge(&self, from: &str, to: &str, kind: RelationKind) {
        self.data.write().await.edges.push(FixtureEdge {
            from: from.to_string(),
            to: to.to_string(),
            kind,
        });
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn find_similar(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredCandidate>> {
        let data = self.data.read().await;
        Ok(score_and_rank(query, data.papers.iter().cloned(), top_k))
    }

    async fn neighbors(&self, paper_id: &str) -> Result<Vec<ConnectionRecord>> {
        let data = self.data.read().await;

        let title_of = |id: &str| {
            data.papers
                .iter()
                .find(|p| p.paper_id == id)
                .map(|p| p.title.clone())
        };

        if title_of(paper_id).is_none() {
            return Ok(Vec::new());
        }

        let connections = data
            .edges
            .iter()
            .filter_map(|edge| {
                let other = if edge.from == paper_id {
                    &edge.to
                } else if edge.to == paper_id {
                    &edge.from
                } else {
                    return None;
                };
                let title = title_of(other)?;
                Some(ConnectionRecord::new(other.clone(), title, edge.kind.clone()))
            })
            .take(MAX_NEIGHBORS)
            .collect();

        Ok(connections)
    }

    async fn paper_count(&self) -> Result<u64> {
        Ok(self.data.read().await.papers.len() as u64)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn corpus() -> MemoryGraphStore {
        let store = MemoryGraphStore::new();
        store
            .add_paper(PaperRecord::new("gcn", "Semi-Supervised Classification with GCNs").with_embedding(vec![1.0, 0.0]))
            .await;
        store
            .add_paper(PaperRecord::new("gat", "Graph Attention Networks").with_embedding(vec![0.8, 0.6]))
            .await;
        store.add_paper(PaperRecord::new("draft", "Unembedded Draft")).await;
        store.add_edge("gat", "gcn", RelationKind::Cites).await;
        store.add_edge("draft", "gcn", RelationKind::parse("MENTIONS")).await;
        store
    }

    #[tokio::test]
    async fn test_find_similar_skips_unembedded() {
        let store = corpus().await;

        let results = store.find_similar(&[1.0, 0.0], 10).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].paper.paper_id, "gcn");
        assert_eq!(results[1].paper.paper_id, "gat");
    }

    #[tokio::test]
    async fn test_neighbors_both_directions() {
        let store = corpus().await;

        let from_gcn = store.neighbors("gcn").await.unwrap();
        assert_eq!(from_gcn.len(), 2);
        assert_eq!(from_gcn[0].paper_id, "gat");
        assert_eq!(from_gcn[0].connection_type, "cites");
        assert_eq!(from_gcn[1].connection_type, "related");

        let from_gat = store.neighbors("gat").await.unwrap();
        assert_eq!(from_gat.len(), 1);
        assert_eq!(from_gat[0].title, "Semi-Supervised Classification with GCNs");
    }

    #[tokio::test]
    async fn test_neighbors_unknown_paper() {
        let store = corpus().await;
        assert!(store.neighbors("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_neighbors_capped() {
        let store = MemoryGraphStore::new();
        store.add_paper(PaperRecord::new("hub", "Hub")).await;
        for i in 0..15 {
            let id = format!("leaf-{}", i);
            store.add_paper(PaperRecord::new(id.clone(), "Leaf")).await;
            store.add_edge(&id, "hub", RelationKind::Cites).await;
        }

        assert_eq!(store.neighbors("hub").await.unwrap().len(), MAX_NEIGHBORS);
        assert_eq!(store.paper_count().await.unwrap(), 16);
    }

    #[tokio::test]
    async fn test_add_paper_replaces() {
        let store = corpus().await;
        store.add_paper(PaperRecord::new("gcn", "GCN (revised)")).await;

        assert_eq!(store.paper_count().await.unwrap(), 3);
        let neighbors = store.neighbors("gat").await.unwrap();
        assert_eq!(neighbors[0].title, "GCN (revised)");
    }

    #[test]
    fn test_fixture_format() {
        let fixture: GraphFixture = serde_json::from_str(
            r#"{
                "papers": [{"paper_id": "a", "title": "A", "year": 2020, "bibtex": "", "link": null, "embedding": [0.1, 0.2]}],
                "edges": [{"from": "a", "to": "b", "kind": "SIMILAR"}]
            }"#,
        )
        .unwrap();

        assert_eq!(fixture.papers[0].embedding.as_deref(), Some(&[0.1f32, 0.2][..]));
        assert_eq!(fixture.edges[0].kind, RelationKind::Similar);
    }
}
