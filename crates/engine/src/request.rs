//! Outbound request assembly from a template's `apiConfig` plus the
//! validated form data.
//!
//! Encoding is method-driven: bodyless methods (GET, HEAD) put scalar values
//! on the query string and skip file uploads; everything else goes out as
//! multipart form data so file fields travel alongside text fields. The
//! Content-Type header is never set by hand on the multipart path, the codec
//! owns the boundary parameter.

use flowdesk_core::template::{ApiConfig, HttpMethod};
use flowdesk_core::value::{FieldValue, FormData};
use reqwest::multipart;
use reqwest::{Client, Request, Url};

use crate::error::EngineError;
use crate::transform::TransformRegistry;

/// Resolve the target URL for `config.endpoint`, joining relative endpoints
/// against `base_url` when one is configured.
pub fn resolve_endpoint(config: &ApiConfig, base_url: Option<&str>) -> Result<Url, EngineError> {
    let endpoint = config.endpoint.trim();
    if endpoint.is_empty() {
        return Err(EngineError::Configuration(
            "Workflow has no endpoint configured".into(),
        ));
    }

    if endpoint.starts_with('/') {
        let base = base_url.ok_or_else(|| {
            EngineError::Configuration(format!(
                "Relative endpoint '{endpoint}' requires a configured API base URL"
            ))
        })?;
        let base = Url::parse(base).map_err(|e| {
            EngineError::Configuration(format!("Invalid API base URL '{base}': {e}"))
        })?;
        return base.join(endpoint).map_err(|e| {
            EngineError::Configuration(format!("Invalid endpoint '{endpoint}': {e}"))
        });
    }

    Url::parse(endpoint)
        .map_err(|e| EngineError::Configuration(format!("Invalid endpoint '{endpoint}': {e}")))
}

/// Build the outbound request. The registered request transform (if the
/// template names one) is applied to the form data before encoding.
pub fn build(
    client: &Client,
    config: &ApiConfig,
    form: FormData,
    transforms: &TransformRegistry,
    base_url: Option<&str>,
) -> Result<Request, EngineError> {
    let url = resolve_endpoint(config, base_url)?;

    let form = match transforms.request_hook(config.transform_request.as_deref())? {
        Some(hook) => hook.apply(form),
        None => form,
    };

    let method = match config.method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
    };
    let multipart_body = !config.method.is_bodyless();
    let mut builder = client.request(method, url);

    if multipart_body {
        let mut body = multipart::Form::new();
        for (key, value) in form.iter() {
            if let FieldValue::File(file) = value {
                let mut part = multipart::Part::bytes(file.bytes.clone())
                    .file_name(file.filename.clone());
                if let Some(ct) = &file.content_type {
                    part = part.mime_str(ct).map_err(|e| {
                        EngineError::Request(format!(
                            "Invalid content type '{ct}' for upload '{}': {e}",
                            file.filename
                        ))
                    })?;
                }
                body = body.part(key.to_string(), part);
            } else if let Some(scalar) = value.to_scalar() {
                body = body.text(key.to_string(), scalar);
            }
        }
        builder = builder.multipart(body);
    } else {
        let pairs: Vec<(String, String)> = form
            .iter()
            .filter_map(|(key, value)| {
                let scalar = value.to_scalar();
                if scalar.is_none() {
                    tracing::debug!(field = key, "skipping file field on bodyless request");
                }
                scalar.map(|v| (key.to_string(), v))
            })
            .collect();
        builder = builder.query(&pairs);
    }

    if let Some(headers) = &config.headers {
        for (name, value) in headers {
            // The multipart codec owns Content-Type (it carries the boundary).
            if multipart_body && name.eq_ignore_ascii_case("content-type") {
                tracing::debug!(header = name.as_str(), "ignoring configured Content-Type on multipart request");
                continue;
            }
            builder = builder.header(name, value);
        }
    }

    builder
        .build()
        .map_err(|e| EngineError::Request(format!("Failed to build request: {e}")))
}
