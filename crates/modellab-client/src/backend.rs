use async_trait::async_trait;
use modellab_core::{ModelLabError, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::Transport;

/// HTTP client for the Model Lab backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

/// Error body shape the backend uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for BackendClient {
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        tracing::info!("POST {}", url);
        tracing::debug!("Request body: {}", body);

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ModelLabError::Http(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ModelLabError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(ModelLabError::Backend {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            ModelLabError::InvalidResponse(format!(
                "{} - Body: {}",
                e,
                truncate(&text, 500)
            ))
        })
    }
}

/// Message for a failed response: the server's `detail` when present,
/// otherwise a generic status line.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail);

    match detail {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        Some(Value::Null) | Some(Value::String(_)) | None => format!(
            "HTTP error! status: {} - {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ),
        // Structured details (e.g. field error lists) are shown as compact JSON.
        Some(other) => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
