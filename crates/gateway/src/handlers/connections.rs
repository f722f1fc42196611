//! Graph connection handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::AppState;
use papergraph_common::ConnectionRecord;

#[derive(Serialize)]
pub struct ConnectionsResponse {
    pub paper_id: String,
    pub total: usize,
    pub connections: Vec<ConnectionRecord>,
}

/// Papers directly connected to a paper. Unknown ids yield an empty list.
pub async fn get_connections(
    State(state): State<AppState>,
    Path(paper_id): Path<String>,
) -> Json<ConnectionsResponse> {
    let connections = state.search.connections(&paper_id).await;

    Json(ConnectionsResponse {
        paper_id,
        total: connections.len(),
        connections,
    })
}
