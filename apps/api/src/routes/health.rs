use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version, the loaded catalog version and the posting backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "chronos-api",
        "catalog_version": state.matcher.catalog().version(),
        "match_mode": state.matcher.mode(),
        "postings_backend": state.postings.backend(),
    }))
}
