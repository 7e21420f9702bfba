//! Deployment debug endpoint
//!
//! GET /api/debug reports whether the upstream key is set (never the key
//! itself), the upstream URL and the listen port.

use crate::config::{ENV_API_KEY, ENV_PORT, ENV_UPSTREAM_URL};
use crate::handlers::AppState;
use axum::{Json, extract::State};
use serde_json::{Value, json};

/// GET /api/debug handler
pub async fn handler(State(state): State<AppState>) -> Json<Value> {
    let config = state.config();
    let key_status = if config.upstream.api_key().is_some() {
        "SET"
    } else {
        "NOT SET"
    };

    Json(json!({
        ENV_API_KEY: key_status,
        ENV_UPSTREAM_URL: config.upstream.url,
        ENV_PORT: config.server.port.to_string(),
    }))
}
