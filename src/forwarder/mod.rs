//! Completion forwarder
//!
//! Lists registered models, probes a model upstream, and relays chat
//! completion requests for active models to the configured upstream API.

pub mod client;
pub mod types;

pub use client::{UpstreamClient, UpstreamReply};
pub use types::{
    CompletionRequest, ModelList, ModelObject, ModelStatusObject, ProbeResult,
    extract_probe_output, probe_payload,
};

use crate::config::UpstreamConfig;
use crate::error::{AppError, AppResult};
use crate::metrics::{CompletionOutcome, Metrics, UpstreamCall};
use crate::registry::ModelRegistry;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct CompletionForwarder {
    registry: Arc<ModelRegistry>,
    upstream: UpstreamClient,
    metrics: Arc<Metrics>,
    probe_timeout: Duration,
    completion_timeout: Duration,
}

impl CompletionForwarder {
    pub fn new(
        registry: Arc<ModelRegistry>,
        config: &UpstreamConfig,
        metrics: Arc<Metrics>,
    ) -> AppResult<Self> {
        Ok(Self {
            registry,
            upstream: UpstreamClient::new(config)?,
            metrics,
            probe_timeout: config.probe_timeout(),
            completion_timeout: config.completion_timeout(),
        })
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    /// Active models in OpenAI list shape
    pub async fn list_active(&self) -> AppResult<ModelList<ModelObject>> {
        let ids = self.registry.list_active().await?;
        Ok(ModelList::new(ids.into_iter().map(ModelObject::new).collect()))
    }

    /// Every registered model with its flag
    pub async fn list_all(&self) -> AppResult<ModelList<ModelStatusObject>> {
        let records = self.registry.list_all().await?;
        Ok(ModelList::new(
            records
                .into_iter()
                .map(|record| ModelStatusObject::new(record.id, record.active))
                .collect(),
        ))
    }

    /// Send the fixed probe message to `model`
    ///
    /// The model does not have to be registered. Upstream error bodies are
    /// reported in `output`, not as a failure. Without an API key nothing is
    /// sent and the caller gets a 400.
    pub async fn test_model(&self, model: &str) -> AppResult<ProbeResult> {
        if !self.upstream.has_api_key() {
            self.metrics.record_probe(false);
            return Err(AppError::ModelTestWithoutApiKey);
        }

        let started = Instant::now();
        let result = self
            .upstream
            .post_chat(&probe_payload(model), None, self.probe_timeout)
            .await;
        self.metrics.record_upstream_duration(
            UpstreamCall::Probe,
            started.elapsed().as_secs_f64() * 1000.0,
        );
        self.metrics.record_probe(result.is_ok());

        let reply = result?;
        let output = extract_probe_output(&reply.body);
        tracing::info!(
            model = %model,
            status = %reply.status,
            "Model probe completed"
        );

        Ok(ProbeResult {
            model: model.to_string(),
            output,
            raw: reply.body,
        })
    }

    /// Relay a chat completion request for an active model
    ///
    /// The upstream body and status come back unchanged, including upstream
    /// errors. Nothing is sent when the model is inactive or no key is set.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
        referer: Option<&str>,
    ) -> AppResult<UpstreamReply> {
        let active = match request.model() {
            Some(model) => self.registry.is_active(model).await?,
            None => false,
        };
        let Some(model) = request.model().filter(|_| active) else {
            self.metrics.record_completion(CompletionOutcome::Rejected);
            return Err(AppError::ModelNotActive {
                model: request.model().map(str::to_string),
            });
        };

        if !self.upstream.has_api_key() {
            self.metrics.record_completion(CompletionOutcome::Rejected);
            return Err(AppError::MissingApiKey);
        }

        if request.is_stream() {
            tracing::debug!(
                model = %model,
                "stream flag forwarded; response is still returned as one JSON body"
            );
        }

        let payload = request.upstream_payload(model);
        let started = Instant::now();
        let result = self
            .upstream
            .post_chat(&payload, referer, self.completion_timeout)
            .await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.metrics
            .record_upstream_duration(UpstreamCall::Completion, elapsed_ms);

        match result {
            Ok(reply) => {
                self.metrics.record_completion(CompletionOutcome::Forwarded);
                tracing::info!(
                    model = %model,
                    status = %reply.status,
                    elapsed_ms,
                    "Completion forwarded"
                );
                Ok(reply)
            }
            Err(e) => {
                self.metrics.record_completion(CompletionOutcome::Failed);
                Err(e)
            }
        }
    }
}
