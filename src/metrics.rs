//! Prometheus metrics collection for modelgate
//!
//! Tracks forwarded completions, model probes, registry mutations and
//! upstream latency. Exposed via `GET /metrics` in Prometheus text format.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Outcome of a completion request, used as a metric label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Sent upstream; the upstream status may still be an error
    Forwarded,
    /// Refused locally (inactive model, missing key)
    Rejected,
    /// Transport failure or unreadable upstream body
    Failed,
}

impl CompletionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionOutcome::Forwarded => "forwarded",
            CompletionOutcome::Rejected => "rejected",
            CompletionOutcome::Failed => "failed",
        }
    }
}

/// Registry operation, used as a metric label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryOperation {
    Upsert,
    Toggle,
    Delete,
}

impl RegistryOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryOperation::Upsert => "upsert",
            RegistryOperation::Toggle => "toggle",
            RegistryOperation::Delete => "delete",
        }
    }
}

/// Which upstream call a latency sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamCall {
    Completion,
    Probe,
}

impl UpstreamCall {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamCall::Completion => "completion",
            UpstreamCall::Probe => "probe",
        }
    }
}

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    completions_total: IntCounterVec,
    probes_total: IntCounterVec,
    registry_mutations_total: IntCounterVec,
    upstream_duration: HistogramVec,
}

impl Metrics {
    /// Create a new Metrics instance with its own Prometheus registry
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let completions_total = IntCounterVec::new(
            Opts::new(
                "modelgate_completions_total",
                "Chat completion requests by outcome",
            ),
            &["outcome"],
        )?;

        let probes_total = IntCounterVec::new(
            Opts::new("modelgate_probes_total", "Model probes by outcome"),
            &["outcome"],
        )?;

        // Only counts mutations that changed the registry file
        let registry_mutations_total = IntCounterVec::new(
            Opts::new(
                "modelgate_registry_mutations_total",
                "Applied model registry mutations by operation",
            ),
            &["operation"],
        )?;

        let upstream_duration = HistogramVec::new(
            HistogramOpts::new(
                "modelgate_upstream_duration_ms",
                "Upstream chat completion latency in milliseconds",
            )
            .buckets(vec![
                50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0,
            ]),
            &["call"],
        )?;

        registry.register(Box::new(completions_total.clone()))?;
        registry.register(Box::new(probes_total.clone()))?;
        registry.register(Box::new(registry_mutations_total.clone()))?;
        registry.register(Box::new(upstream_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            completions_total,
            probes_total,
            registry_mutations_total,
            upstream_duration,
        })
    }

    pub fn record_completion(&self, outcome: CompletionOutcome) {
        self.completions_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn record_probe(&self, ok: bool) {
        let outcome = if ok { "ok" } else { "failed" };
        self.probes_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_registry_mutation(&self, operation: RegistryOperation) {
        self.registry_mutations_total
            .with_label_values(&[operation.as_str()])
            .inc();
    }

    /// Record upstream latency; non-finite samples are dropped
    pub fn record_upstream_duration(&self, call: UpstreamCall, duration_ms: f64) {
        if !duration_ms.is_finite() {
            tracing::warn!(
                call = call.as_str(),
                duration_ms,
                "Dropping non-finite upstream duration sample"
            );
            return;
        }
        self.upstream_duration
            .with_label_values(&[call.as_str()])
            .observe(duration_ms);
    }

    pub fn completion_count(&self, outcome: CompletionOutcome) -> u64 {
        self.completions_total
            .with_label_values(&[outcome.as_str()])
            .get()
    }

    pub fn registry_mutation_count(&self, operation: RegistryOperation) -> u64 {
        self.registry_mutations_total
            .with_label_values(&[operation.as_str()])
            .get()
    }

    /// Encode all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&metric_families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!("Metrics output is not valid UTF-8: {}", e))
        })
    }
}
