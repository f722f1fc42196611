//! PaperGraph Common Library
//!
//! Shared code for the PaperGraph search pipeline including:
//! - Paper and connection data model
//! - Embedding and completion provider clients
//! - Cosine similarity scoring
//! - Graph store access (Neo4j and in-memory)
//! - Error types and configuration
//! - Metrics and observability

pub mod config;
pub mod embeddings;
pub mod errors;
pub mod graph;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod similarity;

// Re-export commonly used types
pub use config::AppConfig;
pub use embeddings::Embedder;
pub use errors::{AppError, Result};
pub use graph::GraphStore;
pub use llm::CompletionProvider;
pub use models::{ConnectionRecord, DatabaseStats, PaperRecord, RelationKind, ScoredCandidate};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "mistral-embed";

/// Default embedding dimension
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1024;

/// Default completion model
pub const DEFAULT_COMPLETION_MODEL: &str = "mistral-small-latest";

/// Default provider API base
pub const DEFAULT_API_BASE: &str = "https://api.mistral.ai/v1";
