//! HTTP client for the upstream chat completions API

use crate::config::UpstreamConfig;
use crate::error::{AppError, AppResult};
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::time::Duration;

/// Header OpenRouter uses to attribute traffic to an application
const TITLE_HEADER: &str = "x-title";
/// OpenRouter reads the referring site from this header
const REFERER_HEADER: &str = "http-referer";

/// Upstream response relayed to the caller as-is
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Thin wrapper around one pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
    default_referer: String,
    title: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: config.url.clone(),
            api_key: config.api_key().map(str::to_string),
            default_referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// POST `payload` to the chat completions URL
    ///
    /// Any status the upstream returns is passed back in the reply; only
    /// transport failures and non-JSON bodies are errors.
    pub async fn post_chat(
        &self,
        payload: &Value,
        referer: Option<&str>,
        timeout: Duration,
    ) -> AppResult<UpstreamReply> {
        let api_key = self.api_key.as_deref().ok_or(AppError::MissingApiKey)?;
        let referer = referer
            .and_then(|r| HeaderValue::from_str(r).ok())
            .or_else(|| HeaderValue::from_str(&self.default_referer).ok());

        let mut request = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .header(TITLE_HEADER, &self.title)
            .timeout(timeout)
            .json(payload);
        if let Some(referer) = referer {
            request = request.header(REFERER_HEADER, referer);
        }

        let transport_err = |source| AppError::UpstreamTransport {
            url: self.url.clone(),
            source,
        };

        let response = request.send().await.map_err(transport_err)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_err)?;

        let body = serde_json::from_slice(&bytes).map_err(|source| {
            AppError::UpstreamInvalidBody {
                url: self.url.clone(),
                status: status.as_u16(),
                source,
            }
        })?;

        tracing::debug!(
            url = %self.url,
            status = %status,
            bytes = bytes.len(),
            "Upstream responded"
        );

        Ok(UpstreamReply { status, body })
    }
}
