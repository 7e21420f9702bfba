//! HTTP request handlers for the modelgate API

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::forwarder::CompletionForwarder;
use crate::metrics::Metrics;
use crate::middleware::request_id_middleware;
use crate::registry::ModelRegistry;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod debug;
pub mod health;
pub mod manage;
pub mod metrics;
pub mod models;
pub mod openai;
pub mod probe;

/// Application state shared across all handlers
///
/// All fields are Arc'd for cheap cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    registry: Arc<ModelRegistry>,
    forwarder: Arc<CompletionForwarder>,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Create a new AppState from configuration
    ///
    /// The registry is bound to `config.registry.path` here and nowhere else.
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let metrics = Arc::new(
            Metrics::new()
                .map_err(|e| AppError::Internal(format!("Failed to register metrics: {}", e)))?,
        );
        let registry = Arc::new(ModelRegistry::new(config.registry.path.clone()));
        let forwarder = Arc::new(CompletionForwarder::new(
            registry.clone(),
            &config.upstream,
            metrics.clone(),
        )?);

        Ok(Self {
            config,
            registry,
            forwarder,
            metrics,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn forwarder(&self) -> &CompletionForwarder {
        &self.forwarder
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(manage::index).post(manage::submit))
        .route("/delete", get(manage::delete))
        .route("/toggle", get(manage::toggle))
        .route("/api/models", get(models::handler))
        .route("/models", get(models::handler))
        .route("/api/active-models", get(openai::models::handler))
        .route("/v1/models", get(openai::models::handler))
        .route("/api/test/{*model}", get(probe::handler))
        .route("/api/complete", post(openai::completions::handler))
        .route("/v1/chat/completions", post(openai::completions::handler))
        .route("/api/debug", get(debug::handler))
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create_test_config() -> Config {
        let mut config = Config::default();
        config.server.port = 3000;
        config.registry.path = PathBuf::from("/tmp/modelgate-state-test/api_config.json");
        config
    }

    #[test]
    fn test_appstate_new_creates_state() {
        let state = AppState::new(Arc::new(create_test_config())).unwrap();

        assert_eq!(state.config().server.port, 3000);
        assert_eq!(
            state.registry().path(),
            PathBuf::from("/tmp/modelgate-state-test/api_config.json")
        );
    }

    #[test]
    fn test_appstate_is_clonable() {
        let state = AppState::new(Arc::new(create_test_config())).unwrap();

        let state2 = state.clone();
        assert_eq!(state2.config().server.port, 3000);
        assert!(Arc::ptr_eq(state.metrics(), state2.metrics()));
    }

    #[test]
    fn test_appstate_without_key_has_no_upstream_key() {
        let state = AppState::new(Arc::new(create_test_config())).unwrap();
        assert!(!state.forwarder().upstream().has_api_key());
    }
}
