//! PaperGraph Search
//!
//! Semantic search over a paper graph:
//! - Query embedding and similarity ranking ([`retrieval`])
//! - Tiers, summaries, and similarity analysis ([`enrichment`])
//! - Pipeline entry points ([`SearchService`])

pub mod enrichment;
pub mod retrieval;
pub mod service;

#[cfg(test)]
mod test_support;

pub use enrichment::{EnrichOptions, EnrichedResult, ResultEnricher, SimilarityAnalysis, SimilarityTier};
pub use retrieval::{RetrievalMode, Retriever};
pub use service::{SearchOutcome, SearchRequest, SearchService};
