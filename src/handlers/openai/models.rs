//! OpenAI-compatible models list handler
//!
//! Handles GET /v1/models and GET /api/active-models.

use crate::error::AppResult;
use crate::forwarder::{ModelList, ModelObject};
use crate::handlers::AppState;
use axum::{Json, extract::State};

/// GET /v1/models handler
///
/// Returns only active models:
///
/// ```json
/// {"data": [{"id": "vendor/model", "object": "model"}]}
/// ```
pub async fn handler(State(state): State<AppState>) -> AppResult<Json<ModelList<ModelObject>>> {
    Ok(Json(state.forwarder().list_active().await?))
}
