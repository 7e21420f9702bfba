//! Management page and form endpoints
//!
//! `GET /` lists the registry; `POST /`, `/toggle` and `/delete` mutate it and
//! redirect back to the page.

use crate::error::AppResult;
use crate::handlers::AppState;
use crate::metrics::RegistryOperation;
use crate::registry::ModelRecord;
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;

/// Form body of `POST /`
#[derive(Debug, Deserialize)]
pub struct ModelForm {
    #[serde(default)]
    pub model: String,
    /// HTML checkbox: present as `on` when ticked, absent otherwise
    pub active: Option<String>,
}

impl ModelForm {
    pub fn is_active(&self) -> bool {
        self.active.as_deref() == Some("on")
    }
}

/// `?model=<id>` query of `/toggle` and `/delete`
#[derive(Debug, Deserialize)]
pub struct ModelQuery {
    pub model: Option<String>,
}

impl ModelQuery {
    fn model(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.is_empty())
    }
}

/// GET / handler
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let records = state.registry().list_all().await?;
    Ok(Html(render_page(&records)))
}

/// POST / handler: upsert from the add form
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ModelForm>,
) -> AppResult<Redirect> {
    let active = form.is_active();
    if state.registry().upsert(&form.model, active).await? {
        state
            .metrics()
            .record_registry_mutation(RegistryOperation::Upsert);
        tracing::info!(model = %form.model.trim(), active, "Model saved");
    }
    Ok(Redirect::to("/"))
}

/// GET /toggle handler
pub async fn toggle(
    State(state): State<AppState>,
    Query(query): Query<ModelQuery>,
) -> AppResult<Redirect> {
    let Some(model) = query.model() else {
        tracing::warn!("Toggle request without model parameter");
        return Ok(Redirect::to("/"));
    };

    match state.registry().toggle(model).await? {
        Some(active) => {
            state
                .metrics()
                .record_registry_mutation(RegistryOperation::Toggle);
            tracing::info!(model = %model, active, "Model toggled");
        }
        None => tracing::warn!(model = %model, "Toggle requested for unknown model"),
    }
    Ok(Redirect::to("/"))
}

/// GET /delete handler
pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<ModelQuery>,
) -> AppResult<Redirect> {
    let Some(model) = query.model() else {
        tracing::warn!("Delete request without model parameter");
        return Ok(Redirect::to("/"));
    };

    if state.registry().delete(model).await? {
        state
            .metrics()
            .record_registry_mutation(RegistryOperation::Delete);
        tracing::info!(model = %model, "Model deleted");
    } else {
        tracing::warn!(model = %model, "Delete requested for unknown model");
    }
    Ok(Redirect::to("/"))
}

fn render_page(records: &[ModelRecord]) -> String {
    let rows: String = records
        .iter()
        .map(|record| {
            let id = escape_html(&record.id);
            let test_href = escape_html(&model_test_href(&record.id));
            let status = if record.active { "active" } else { "inactive" };
            format!(
                r#"<tr><td>{id}</td><td>{status}</td><td>
<form method="get" action="/toggle"><input type="hidden" name="model" value="{id}"><button>Toggle</button></form>
<form method="get" action="/delete"><input type="hidden" name="model" value="{id}"><button>Delete</button></form>
<a href="{test_href}">Test</a>
</td></tr>
"#
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>modelgate</title></head>
<body>
<h1>Models</h1>
<table>
<tr><th>Model</th><th>Status</th><th></th></tr>
{rows}</table>
<h2>Add or update</h2>
<form method="post" action="/">
<input type="text" name="model" placeholder="vendor/model-id" required>
<label><input type="checkbox" name="active" checked> active</label>
<button type="submit">Save</button>
</form>
</body>
</html>
"#
    )
}

/// Test link for `id`, percent-encoding each `/`-separated segment
fn model_test_href(id: &str) -> String {
    let segments: Vec<_> = id.split('/').map(urlencoding::encode).collect();
    format!("/api/test/{}", segments.join("/"))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkbox_on_means_active() {
        let ticked = ModelForm {
            model: "m".to_string(),
            active: Some("on".to_string()),
        };
        let unticked = ModelForm {
            model: "m".to_string(),
            active: None,
        };
        assert!(ticked.is_active());
        assert!(!unticked.is_active());
    }

    #[test]
    fn test_empty_query_model_is_missing() {
        let query = ModelQuery {
            model: Some(String::new()),
        };
        assert_eq!(query.model(), None);
    }

    #[test]
    fn test_page_escapes_model_ids() {
        let page = render_page(&[ModelRecord {
            id: "<script>\"x\"".to_string(),
            active: true,
        }]);
        assert!(!page.contains("<script>\"x\""));
        assert!(page.contains("&lt;script&gt;&quot;x&quot;"));
    }

    #[test]
    fn test_model_test_href_encodes_segments_but_keeps_slashes() {
        assert_eq!(model_test_href("openai/gpt-4o"), "/api/test/openai/gpt-4o");
        assert_eq!(
            model_test_href("vendor/model?v=1#a b%"),
            "/api/test/vendor/model%3Fv%3D1%23a%20b%25"
        );
    }

    #[test]
    fn test_page_links_encoded_test_path() {
        let page = render_page(&[ModelRecord {
            id: "lab/x?y&z".to_string(),
            active: true,
        }]);
        assert!(page.contains(r#"<a href="/api/test/lab/x%3Fy%26z">Test</a>"#));
    }

    #[test]
    fn test_page_shows_status() {
        let page = render_page(&[
            ModelRecord {
                id: "on-model".to_string(),
                active: true,
            },
            ModelRecord {
                id: "off-model".to_string(),
                active: false,
            },
        ]);
        assert!(page.contains("<td>on-model</td><td>active</td>"));
        assert!(page.contains("<td>off-model</td><td>inactive</td>"));
    }
}
