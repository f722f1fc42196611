//! Search handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::AppJson;
use crate::AppState;
use papergraph_common::errors::{AppError, Result};
use papergraph_search::{EnrichedResult, RetrievalMode, SearchRequest};

/// Search request body
#[derive(Debug, Deserialize, Validate)]
pub struct SearchBody {
    #[validate(length(min = 1, max = 2000))]
    pub query: String,

    /// Maximum results to return
    #[serde(default)]
    pub top_k: Option<usize>,

    /// Search mode: vector (default) or hybrid
    #[serde(default)]
    pub mode: RetrievalMode,

    /// Generate a summary per result
    #[serde(default)]
    pub summarize: Option<bool>,

    /// Generate a similarity analysis per result
    #[serde(default)]
    pub analyze: bool,
}

/// Search response
#[derive(Serialize)]
pub struct SearchResponse {
    pub search_id: Uuid,
    pub query: String,
    pub mode: RetrievalMode,
    pub total_results: usize,
    pub results: Vec<EnrichedResult>,
    pub processing_time_ms: u64,
}

/// Perform a search
pub async fn search(
    State(state): State<AppState>,
    AppJson(body): AppJson<SearchBody>,
) -> Result<Json<SearchResponse>> {
    body.validate()
        .map_err(|e| AppError::validation("query", e.to_string()))?;

    let request = SearchRequest {
        query: body.query,
        top_k: body.top_k,
        mode: body.mode,
        summarize: body.summarize,
        analyze: body.analyze,
    };

    let outcome = state.search.search_with(&request).await?;

    Ok(Json(SearchResponse {
        search_id: outcome.search_id,
        query: outcome.query,
        mode: outcome.mode,
        total_results: outcome.results.len(),
        results: outcome.results,
        processing_time_ms: outcome.processing_time_ms,
    }))
}
