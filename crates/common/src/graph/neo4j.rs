//! Neo4j access over the HTTP transactional endpoint
//!
//! Every operation is a single auto-commit statement posted to
//! `{uri}/db/{database}/tx/commit`. Similarity is computed inside Cypher,
//! so the store scans every embedded `:Paper` node per query.

use super::{GraphStore, MAX_NEIGHBORS};
use crate::config::GraphConfig;
use crate::errors::{AppError, Result};
use crate::metrics;
use crate::models::{ConnectionRecord, PaperRecord, RelationKind, ScoredCandidate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::debug;

const SIMILAR_PAPERS_CYPHER: &str = r#"
    MATCH (p:Paper)
    WHERE p.embedding IS NOT NULL
    WITH p, p.embedding AS emb, $query_embedding AS q
    WITH p,
         size(emb) = size(q) AS same_dim,
         reduce(s = 0.0, i IN range(0, size(emb) - 1) | s + emb[i] * q[i]) AS dot,
         sqrt(reduce(s = 0.0, x IN emb | s + x * x)) AS norm1,
         sqrt(reduce(s = 0.0, x IN q | s + x * x)) AS norm2
    WITH p,
         CASE
             WHEN NOT same_dim OR norm1 = 0 OR norm2 = 0 THEN 0.0
             ELSE dot / (norm1 * norm2)
         END AS similarity
    ORDER BY similarity DESC
    LIMIT $top_k
    RETURN p.paper_id AS paper_id,
           p.title AS title,
           p.bibtex AS bibtex,
           p.year AS year,
           p.link AS link,
           similarity
"#;

const NEIGHBORS_CYPHER: &str = r#"
    MATCH (p:Paper {paper_id: $paper_id})-[r]-(connected:Paper)
    RETURN connected.paper_id AS paper_id,
           connected.title AS title,
           type(r) AS relationship_type
    LIMIT $limit
"#;

const COUNT_CYPHER: &str = "MATCH (p:Paper) RETURN count(p) AS paper_count";

/// Neo4j graph store client
pub struct Neo4jStore {
    client: reqwest::Client,
    endpoint: String,
    user: String,
    password: String,
}

#[derive(Serialize)]
struct TxRequest<'a> {
    statements: Vec<TxStatement<'a>>,
}

#[derive(Serialize)]
struct TxStatement<'a> {
    statement: &'a str,
    parameters: Value,
}

#[derive(Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<QueryResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Deserialize)]
struct TxError {
    code: String,
    message: String,
}

/// Result set of one statement
#[derive(Debug, Deserialize)]
struct QueryResult {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<QueryRow>,
}

#[derive(Debug, Deserialize)]
struct QueryRow {
    row: Vec<Value>,
}

/// Column-addressed view of one row
struct Record<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Record<'a> {
    fn get(&self, column: &str) -> Option<&'a Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.values.get(index).filter(|v| !v.is_null())
    }

    fn string(&self, column: &str) -> String {
        self.opt_string(column).unwrap_or_default()
    }

    fn opt_string(&self, column: &str) -> Option<String> {
        match self.get(column)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Years are stored as integers or numeric strings depending on the loader
    fn year(&self, column: &str) -> Option<i32> {
        match self.get(column)? {
            Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn f64(&self, column: &str) -> Option<f64> {
        self.get(column)?.as_f64()
    }

    fn u64(&self, column: &str) -> Option<u64> {
        self.get(column)?.as_u64()
    }
}

impl QueryResult {
    fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.data.iter().map(move |r| Record {
            columns: &self.columns,
            values: &r.row,
        })
    }
}

impl Neo4jStore {
    /// Create a new client from configuration
    pub fn new(config: &GraphConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/db/{}/tx/commit",
                config.uri.trim_end_matches('/'),
                config.database
            ),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    /// Run one statement and return its result set
    async fn run(&self, operation: &'static str, statement: &str, parameters: Value) -> Result<QueryResult> {
        let start = Instant::now();
        let result = self.execute(statement, parameters).await;
        metrics::record_graph_query(start.elapsed().as_secs_f64(), operation, result.is_ok());
        debug!(
            operation,
            latency_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Graph query finished"
        );
        result
    }

    async fn execute(&self, statement: &str, parameters: Value) -> Result<QueryResult> {
        let request = TxRequest {
            statements: vec![TxStatement { statement, parameters }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.user, Some(&self.password))
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::GraphStore {
                message: format!("Request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GraphStore {
                message: format!("Neo4j error {}: {}", status, body),
            });
        }

        let body: TxResponse = response.json().await.map_err(|e| AppError::GraphStore {
            message: format!("Failed to parse response: {}", e),
        })?;

        parse_response(body)
    }
}

fn parse_response(body: TxResponse) -> Result<QueryResult> {
    if let Some(err) = body.errors.into_iter().next() {
        return Err(AppError::GraphStore {
            message: format!("{}: {}", err.code, err.message),
        });
    }

    body.results.into_iter().next().ok_or_else(|| AppError::GraphStore {
        message: "Empty result set".to_string(),
    })
}

fn candidate_from(record: &Record<'_>) -> ScoredCandidate {
    ScoredCandidate {
        paper: PaperRecord {
            paper_id: record.string("paper_id"),
            title: record.string("title"),
            year: record.year("year"),
            bibtex: record.string("bibtex"),
            link: record.opt_string("link"),
            embedding: None,
        },
        score: record.f64("similarity").unwrap_or(0.0),
    }
}

fn connection_from(record: &Record<'_>) -> ConnectionRecord {
    ConnectionRecord::new(
        record.string("paper_id"),
        record.string("title"),
        RelationKind::parse(&record.string("relationship_type")),
    )
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn find_similar(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredCandidate>> {
        let result = self
            .run(
                "find_similar",
                SIMILAR_PAPERS_CYPHER,
                json!({ "query_embedding": query, "top_k": top_k }),
            )
            .await?;

        Ok(result.records().map(|r| candidate_from(&r)).collect())
    }

    async fn neighbors(&self, paper_id: &str) -> Result<Vec<ConnectionRecord>> {
        let result = self
            .run(
                "neighbors",
                NEIGHBORS_CYPHER,
                json!({ "paper_id": paper_id, "limit": MAX_NEIGHBORS }),
            )
            .await?;

        Ok(result.records().map(|r| connection_from(&r)).collect())
    }

    async fn paper_count(&self) -> Result<u64> {
        let result = self.run("paper_count", COUNT_CYPHER, json!({})).await?;

        let count = result
            .records()
            .next()
            .and_then(|r| r.u64("paper_count"))
            .unwrap_or(0);
        Ok(count)
    }

    async fn ping(&self) -> Result<()> {
        self.run("ping", "RETURN 1", json!({})).await.map(|_| ())
    }

    fn backend(&self) -> &'static str {
        "neo4j"
    }
}
