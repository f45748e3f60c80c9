//! Response classification.
//!
//! The upstream service decides what it returns; the engine sorts the payload
//! into one of five result shapes by Content-Type, in priority order: JSON,
//! image, PDF, plain text, and finally an opaque download for everything
//! else. Non-2xx responses never classify, they surface as hard errors.

use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::EngineError;
use crate::object_url::{ObjectStore, ObjectUrl};
use crate::transform::ResponseTransform;

/// A classified workflow response, ready for rendering.
#[derive(Debug, Clone)]
pub enum WorkflowResult {
    Json(serde_json::Value),
    Image(ObjectUrl),
    Pdf(ObjectUrl),
    Text(String),
    Blob(ObjectUrl),
}

impl WorkflowResult {
    /// Stable discriminant used on the wire and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowResult::Json(_) => "json",
            WorkflowResult::Image(_) => "image",
            WorkflowResult::Pdf(_) => "pdf",
            WorkflowResult::Text(_) => "text",
            WorkflowResult::Blob(_) => "blob",
        }
    }
}

impl Serialize for WorkflowResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("WorkflowResult", 2)?;
        s.serialize_field("type", self.kind())?;
        match self {
            WorkflowResult::Json(value) => s.serialize_field("data", value)?,
            WorkflowResult::Image(url) | WorkflowResult::Pdf(url) | WorkflowResult::Blob(url) => {
                s.serialize_field("data", url)?
            }
            WorkflowResult::Text(text) => s.serialize_field("data", text)?,
        }
        s.end()
    }
}

/// Classify a response body from its declared Content-Type.
///
/// Binary shapes (image, PDF, blob) are parked in `store`; the returned
/// handle keeps the bytes alive. A missing Content-Type classifies as blob.
pub fn classify_parts(
    store: &ObjectStore,
    content_type: Option<&str>,
    bytes: Vec<u8>,
    response_hook: Option<&Arc<dyn ResponseTransform>>,
) -> Result<WorkflowResult, EngineError> {
    let content_type = content_type.unwrap_or("").to_ascii_lowercase();

    if content_type.contains("application/json") {
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| EngineError::Decode(format!("Invalid JSON response: {e}")))?;
        let value = match response_hook {
            Some(hook) => hook.apply(value),
            None => value,
        };
        return Ok(WorkflowResult::Json(value));
    }

    if content_type.contains("image/") {
        return Ok(WorkflowResult::Image(store.insert(content_type, bytes)));
    }

    if content_type.contains("application/pdf") {
        return Ok(WorkflowResult::Pdf(store.insert(content_type, bytes)));
    }

    if content_type.contains("text/") {
        let text = String::from_utf8(bytes)
            .map_err(|e| EngineError::Decode(format!("Response is not valid UTF-8: {e}")))?;
        return Ok(WorkflowResult::Text(text));
    }

    let content_type = if content_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        content_type
    };
    Ok(WorkflowResult::Blob(store.insert(content_type, bytes)))
}

/// Classify a live response. Status is checked first: non-2xx is a hard
/// error carrying the status code and the response body as its message.
pub async fn classify(
    store: &ObjectStore,
    response: reqwest::Response,
    response_hook: Option<&Arc<dyn ResponseTransform>>,
) -> Result<WorkflowResult, EngineError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(EngineError::Http {
            status: status.as_u16(),
            message,
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let bytes = response
        .bytes()
        .await
        .map_err(|e| EngineError::Transport(format!("Failed to read response body: {e}")))?;

    classify_parts(store, content_type.as_deref(), bytes.to_vec(), response_hook)
}
