//! Handler for running a workflow.
//!
//! Accepts the submitted form either as `multipart/form-data` (required for
//! file fields) or as a flat JSON object of key/value pairs. Validation
//! failures inside the run do not produce an HTTP error: the run itself is
//! the resource, so the handler returns `200 OK` with a terminal execution
//! report either way. Only a missing workflow is an HTTP-level 404.

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use flowdesk_core::types::WorkflowId;
use flowdesk_core::validate::RawValue;
use flowdesk_core::value::FileUpload;
use flowdesk_engine::{render, Execution};
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// JSON body cap for the non-multipart submission path. File uploads must
/// use multipart.
const MAX_JSON_BODY_BYTES: usize = 1024 * 1024;

/// Terminal report for one run: the execution record plus its plain-text
/// rendering (present when the run produced a result).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    #[serde(flatten)]
    pub execution: Execution,
    pub rendered: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /workflows/{id}/execute
// ---------------------------------------------------------------------------

/// Run a workflow with the submitted form values.
pub async fn execute_workflow(
    State(state): State<AppState>,
    Path(id): Path<WorkflowId>,
    request: Request,
) -> AppResult<impl IntoResponse> {
    let workflow = state.store.get(id).await?;

    let raw = collect_submission(&state, request).await?;
    tracing::info!(workflow_id = %id, fields = raw.len(), "Executing workflow");

    let execution = state
        .executor
        .execute(&workflow, raw, CancellationToken::new())
        .await;

    let rendered = execution.result.as_ref().map(render);
    let report = ExecutionReport {
        execution: execution.clone(),
        rendered,
    };

    // Supersede the previous run; dropping it releases its result objects.
    state.executions.write().await.insert(id, execution);

    Ok(Json(DataResponse { data: report }))
}

/// Decode the submitted form values from the request body.
///
/// `multipart/form-data` parts with a filename become file values; all
/// other parts, and every member of a JSON object body, become text values.
async fn collect_submission(
    state: &AppState,
    request: Request,
) -> AppResult<Vec<(String, RawValue)>> {
    let content_type = request
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?;
        return collect_multipart(multipart).await;
    }

    let bytes = axum::body::to_bytes(request.into_body(), MAX_JSON_BODY_BYTES)
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read request body: {e}")))?;
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let body: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    Ok(body
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, RawValue::Text(text))
        })
        .collect())
}

async fn collect_multipart(mut multipart: Multipart) -> AppResult<Vec<(String, RawValue)>> {
    let mut raw = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            // Nameless parts cannot be matched to a field; skip them.
            continue;
        };

        if let Some(filename) = field.file_name().map(str::to_owned) {
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
            raw.push((
                name,
                RawValue::File(FileUpload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                }),
            ));
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read field: {e}")))?;
            raw.push((name, RawValue::Text(text)));
        }
    }

    Ok(raw)
}
