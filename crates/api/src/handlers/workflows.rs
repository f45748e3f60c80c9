//! Handlers for workflow template CRUD.
//!
//! All persistence goes through the [`WorkflowStore`] trait on shared state,
//! so the same handlers serve memory, file, and remote deployments.
//!
//! [`WorkflowStore`]: flowdesk_store::WorkflowStore

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use flowdesk_core::template::{CreateWorkflow, UpdateWorkflow};
use flowdesk_core::types::WorkflowId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /workflows
// ---------------------------------------------------------------------------

/// List all workflow templates.
pub async fn list_workflows(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = state.store.list().await?;
    tracing::debug!(count = items.len(), "Listed workflows");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /workflows
// ---------------------------------------------------------------------------

/// Create a new workflow template.
pub async fn create_workflow(
    State(state): State<AppState>,
    Json(input): Json<CreateWorkflow>,
) -> AppResult<impl IntoResponse> {
    let created = state.store.create(input).await?;
    tracing::info!(id = %created.id, name = %created.name, "Workflow created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /workflows/{id}
// ---------------------------------------------------------------------------

/// Get a single workflow template by ID.
pub async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<WorkflowId>,
) -> AppResult<impl IntoResponse> {
    let workflow = state.store.get(id).await?;
    Ok(Json(DataResponse { data: workflow }))
}

// ---------------------------------------------------------------------------
// PUT /workflows/{id}
// ---------------------------------------------------------------------------

/// Update a workflow template (shallow merge of present fields).
pub async fn update_workflow(
    State(state): State<AppState>,
    Path(id): Path<WorkflowId>,
    Json(patch): Json<UpdateWorkflow>,
) -> AppResult<impl IntoResponse> {
    let updated = state.store.update(id, patch).await?;
    tracing::info!(id = %updated.id, "Workflow updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /workflows/{id}
// ---------------------------------------------------------------------------

/// Delete a workflow template permanently.
pub async fn delete_workflow(
    State(state): State<AppState>,
    Path(id): Path<WorkflowId>,
) -> AppResult<impl IntoResponse> {
    state.store.delete(id).await?;

    // A deleted workflow's last execution has nothing to attach to anymore.
    state.executions.write().await.remove(&id);

    tracing::info!(id = %id, "Workflow deleted");
    Ok(StatusCode::NO_CONTENT)
}
