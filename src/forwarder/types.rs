//! Request and response types for the forwarder
//!
//! The model list shapes follow the OpenAI `/v1/models` format closely enough
//! for OpenAI SDK clients (`{data: [{id, object: "model"}]}`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Object type for individual model entries
pub const OBJECT_MODEL: &str = "model";

/// Request fields copied upstream in addition to `model` and `messages`
pub const FORWARDED_PARAMS: [&str; 6] = [
    "temperature",
    "max_tokens",
    "top_p",
    "frequency_penalty",
    "presence_penalty",
    "stream",
];

/// Message sent by the model probe
pub const PROBE_PROMPT: &str = "Hello, are you working?";

/// Fallback probe output when the upstream body has nothing to show
pub const PROBE_NO_CONTENT: &str = "No content returned from model";

/// Active model as listed by `/v1/models`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelObject {
    pub id: String,
    pub object: String,
}

impl ModelObject {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: OBJECT_MODEL.to_string(),
        }
    }
}

/// Registered model with its flag, as listed by `/api/models`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatusObject {
    pub id: String,
    pub object: String,
    pub active: bool,
}

impl ModelStatusObject {
    pub fn new(id: impl Into<String>, active: bool) -> Self {
        Self {
            id: id.into(),
            object: OBJECT_MODEL.to_string(),
            active,
        }
    }
}

/// `{data: [...]}` wrapper shared by both list endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelList<T> {
    pub data: Vec<T>,
}

impl<T> ModelList<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Result of probing one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub model: String,
    pub output: String,
    pub raw: Value,
}

/// Chat completion request as received from the caller
///
/// Kept as a raw JSON object: only key presence matters for the forwarded
/// parameters, and their values are passed through untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CompletionRequest(Map<String, Value>);

impl CompletionRequest {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The requested model id, when present as a string
    pub fn model(&self) -> Option<&str> {
        self.0.get("model").and_then(Value::as_str)
    }

    /// The messages array, defaulting to `[]`
    pub fn messages(&self) -> Value {
        self.0
            .get("messages")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()))
    }

    pub fn is_stream(&self) -> bool {
        self.0.get("stream").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Build the upstream body: `model`, `messages` and any present
    /// allow-listed parameter, nothing else
    pub fn upstream_payload(&self, model: &str) -> Value {
        let mut payload = Map::new();
        payload.insert("model".to_string(), Value::String(model.to_string()));
        payload.insert("messages".to_string(), self.messages());

        for key in FORWARDED_PARAMS {
            if let Some(value) = self.0.get(key) {
                payload.insert(key.to_string(), value.clone());
            }
        }

        Value::Object(payload)
    }
}

/// Body of the single-message probe sent by `test_model`
pub fn probe_payload(model: &str) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": PROBE_PROMPT}],
    })
}

/// Pull a human-readable output from a probe response body
///
/// Prefers the first choice's message content, then the upstream error, then
/// the whole body.
pub fn extract_probe_output(raw: &Value) -> String {
    let Some(body) = raw.as_object() else {
        return PROBE_NO_CONTENT.to_string();
    };

    let output = if let Some(first) = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
    {
        first.pointer("/message/content").map(render)
    } else if let Some(error) = body.get("error") {
        Some(format!("Error: {}", render(error)))
    } else {
        Some(raw.to_string())
    };

    output
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| PROBE_NO_CONTENT.to_string())
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
