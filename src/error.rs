//! Error types for modelgate
//!
//! All errors implement `IntoResponse` for Axum handlers and render as
//! OpenAI-shaped error bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model not active or not found")]
    ModelNotActive { model: Option<String> },

    #[error("No OPENROUTER_API_KEY set")]
    MissingApiKey,

    /// `test_model` without a key; a client error, unlike `MissingApiKey`
    #[error("No OPENROUTER_API_KEY set")]
    ModelTestWithoutApiKey,

    #[error("Upstream request to {url} failed: {source}")]
    UpstreamTransport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Upstream at {url} returned a non-JSON body (status {status}): {source}")]
    UpstreamInvalidBody {
        url: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read model registry {path}: {source}")]
    RegistryRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Model registry {path} is not valid JSON: {source}")]
    RegistryParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write model registry {path}: {source}")]
    RegistryWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ModelNotActive { .. } | Self::ModelTestWithoutApiKey => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// OpenAI error `type` string for the response body
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::ModelNotActive { .. } => "invalid_request_error",
            Self::MissingApiKey | Self::ModelTestWithoutApiKey => "authentication_error",
            Self::UpstreamTransport { .. } | Self::UpstreamInvalidBody { .. } => "api_error",
            _ => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, error_type = self.error_type(), "Request failed");
        } else {
            tracing::debug!(error = %self, error_type = self.error_type(), "Request rejected");
        }

        (status, error_body(self.to_string(), self.error_type())).into_response()
    }
}

/// OpenAI-shaped error body: `{"error": {"message": ..., "type": ...}}`
pub fn error_body(message: impl Into<String>, error_type: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "error": {
            "message": message.into(),
            "type": error_type,
        }
    }))
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
