use async_trait::async_trait;
use modellab_core::Result;
use serde_json::Value;

/// Sends one JSON body to a backend path and returns the parsed JSON reply.
///
/// Non-2xx replies come back as `ModelLabError::Backend` carrying the
/// user-facing message.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value>;
}
