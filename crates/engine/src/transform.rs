//! Request/response transform hooks.
//!
//! Templates are plain serializable data, so they cannot carry code; instead
//! their `apiConfig.transformRequest` / `transformResponse` fields name hooks
//! registered here at composition time. Resolving an unregistered name is a
//! configuration error, surfaced before any network I/O.

use std::collections::HashMap;
use std::sync::Arc;

use flowdesk_core::value::FormData;

use crate::error::EngineError;

/// Rewrites the collected form data before it is encoded onto the wire.
pub trait RequestTransform: Send + Sync {
    fn apply(&self, data: FormData) -> FormData;
}

/// Rewrites the parsed JSON payload of a successful response.
pub trait ResponseTransform: Send + Sync {
    fn apply(&self, data: serde_json::Value) -> serde_json::Value;
}

impl std::fmt::Debug for dyn RequestTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RequestTransform")
    }
}

impl std::fmt::Debug for dyn ResponseTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ResponseTransform")
    }
}

impl<F> RequestTransform for F
where
    F: Fn(FormData) -> FormData + Send + Sync,
{
    fn apply(&self, data: FormData) -> FormData {
        self(data)
    }
}

impl<F> ResponseTransform for F
where
    F: Fn(serde_json::Value) -> serde_json::Value + Send + Sync,
{
    fn apply(&self, data: serde_json::Value) -> serde_json::Value {
        self(data)
    }
}

/// Named transform hooks available to templates.
#[derive(Default)]
pub struct TransformRegistry {
    request: HashMap<String, Arc<dyn RequestTransform>>,
    response: HashMap<String, Arc<dyn ResponseTransform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_request(
        &mut self,
        name: impl Into<String>,
        transform: impl RequestTransform + 'static,
    ) {
        self.request.insert(name.into(), Arc::new(transform));
    }

    pub fn register_response(
        &mut self,
        name: impl Into<String>,
        transform: impl ResponseTransform + 'static,
    ) {
        self.response.insert(name.into(), Arc::new(transform));
    }

    /// Resolve a request transform by name; `None` resolves to no hook.
    pub fn request_hook(
        &self,
        name: Option<&str>,
    ) -> Result<Option<Arc<dyn RequestTransform>>, EngineError> {
        match name {
            None => Ok(None),
            Some(name) => self.request.get(name).cloned().map(Some).ok_or_else(|| {
                EngineError::Configuration(format!("Unknown request transform '{name}'"))
            }),
        }
    }

    /// Resolve a response transform by name; `None` resolves to no hook.
    pub fn response_hook(
        &self,
        name: Option<&str>,
    ) -> Result<Option<Arc<dyn ResponseTransform>>, EngineError> {
        match name {
            None => Ok(None),
            Some(name) => self.response.get(name).cloned().map(Some).ok_or_else(|| {
                EngineError::Configuration(format!("Unknown response transform '{name}'"))
            }),
        }
    }
}
