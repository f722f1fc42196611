//! Test doubles shared by unit tests

use async_trait::async_trait;
use papergraph_common::errors::{AppError, Result};
use papergraph_common::llm::{CompletionProvider, CompletionRequest};
use papergraph_common::{ConnectionRecord, GraphStore, ScoredCandidate};

/// Completion provider with a fixed outcome
pub enum ScriptedProvider {
    Reply(String),
    Failing,
    MissingKey,
}

impl ScriptedProvider {
    pub fn reply(text: &str) -> Self {
        ScriptedProvider::Reply(text.to_string())
    }

    pub fn failing() -> Self {
        ScriptedProvider::Failing
    }

    pub fn missing_key() -> Self {
        ScriptedProvider::MissingKey
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        match self {
            ScriptedProvider::Reply(text) => Ok(text.clone()),
            ScriptedProvider::Failing => Err(AppError::Completion {
                message: "HTTP 503 Service Unavailable".to_string(),
            }),
            ScriptedProvider::MissingKey => Err(AppError::MissingCredential {
                provider: "mistral".to_string(),
                variable: "MISTRAL_API_KEY".to_string(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Graph store whose every call fails
pub struct FailingStore;

#[async_trait]
impl GraphStore for FailingStore {
    async fn find_similar(&self, _query: &[f32], _top_k: usize) -> Result<Vec<ScoredCandidate>> {
        Err(unavailable())
    }

    async fn neighbors(&self, _paper_id: &str) -> Result<Vec<ConnectionRecord>> {
        Err(unavailable())
    }

    async fn paper_count(&self) -> Result<u64> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<()> {
        Err(unavailable())
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

fn unavailable() -> AppError {
    AppError::GraphStore {
        message: "connection refused".to_string(),
    }
}
