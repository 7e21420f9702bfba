//! Registry listing handler
//!
//! Exposes every registered model with its active flag via GET /api/models
//! (also served at GET /models).

use crate::error::AppResult;
use crate::forwarder::{ModelList, ModelStatusObject};
use crate::handlers::AppState;
use axum::{Json, extract::State};

/// GET /api/models handler
pub async fn handler(
    State(state): State<AppState>,
) -> AppResult<Json<ModelList<ModelStatusObject>>> {
    let models = state.forwarder().list_all().await?;

    tracing::debug!(
        total_models = models.data.len(),
        active_count = models.data.iter().filter(|m| m.active).count(),
        "Listed registered models"
    );

    Ok(Json(models))
}
