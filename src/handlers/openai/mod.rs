//! OpenAI-compatible API handlers
//!
//! - `POST /v1/chat/completions` (and `/api/complete`) - relay to upstream
//! - `GET /v1/models` (and `/api/active-models`) - list active models

pub mod completions;
pub mod extractor;
pub mod models;
