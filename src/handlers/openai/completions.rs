//! OpenAI-compatible chat completions handler
//!
//! Handles POST /v1/chat/completions and POST /api/complete.

use crate::error::AppResult;
use crate::forwarder::{CompletionRequest, UpstreamReply};
use crate::handlers::AppState;
use crate::middleware::RequestId;
use axum::{
    Extension,
    extract::State,
    http::{HeaderMap, header},
};

use super::extractor::OpenAiJson;

/// POST /v1/chat/completions handler
///
/// Relays `{model, messages}` plus the allow-listed sampling parameters to the
/// upstream API and returns its JSON body and status code unchanged.
///
/// # Errors
///
/// - 400 `invalid_request_error` when the model is missing or not active
/// - 500 `authentication_error` when no API key is configured
/// - 500 `api_error` on upstream transport failure or a non-JSON body
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    OpenAiJson(request): OpenAiJson<CompletionRequest>,
) -> AppResult<UpstreamReply> {
    tracing::debug!(
        request_id = %request_id,
        model = ?request.model(),
        stream = request.is_stream(),
        "Received chat completions request"
    );

    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok());

    let reply = state.forwarder().complete(&request, referer).await?;

    tracing::debug!(
        request_id = %request_id,
        status = %reply.status,
        "Relaying upstream response"
    );

    Ok(reply)
}
