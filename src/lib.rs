//! modelgate - model registry and chat completion relay
//!
//! Keeps a JSON registry of model ids with active flags and forwards
//! OpenAI-style chat completion requests for active models to a single
//! upstream API (OpenRouter by default).

pub mod cli;
pub mod config;
pub mod error;
pub mod forwarder;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod registry;
pub mod telemetry;
