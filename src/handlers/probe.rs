//! Model probe handler
//!
//! GET /api/test/{*model} sends a one-line greeting to the model and reports
//! what came back. Model ids may contain `/` (e.g. `openai/gpt-4o`).

use crate::error::AppResult;
use crate::forwarder::ProbeResult;
use crate::handlers::AppState;
use axum::{
    Json,
    extract::{Path, State},
};

/// GET /api/test/{*model} handler
pub async fn handler(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> AppResult<Json<ProbeResult>> {
    tracing::debug!(model = %model, "Probing model");
    Ok(Json(state.forwarder().test_model(&model).await?))
}
