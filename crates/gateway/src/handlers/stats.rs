//! Corpus statistics

use axum::{extract::State, Json};

use crate::AppState;
use papergraph_common::DatabaseStats;

pub async fn get_stats(State(state): State<AppState>) -> Json<DatabaseStats> {
    Json(state.search.stats().await)
}
