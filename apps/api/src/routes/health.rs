use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version and the size of the loaded CV collection.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let index = state.recruiter.index();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cv-matcher",
        "collection": index.name(),
        "chunks": index.len(),
        "indexed_at": index.built_at(),
    }))
}
