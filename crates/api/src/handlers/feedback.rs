//! Handler for post-run feedback.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use flowdesk_core::types::WorkflowId;
use flowdesk_engine::Feedback;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub workflow_id: WorkflowId,
    pub feedback: Feedback,
}

// ---------------------------------------------------------------------------
// POST /workflow-feedback
// ---------------------------------------------------------------------------

/// Record feedback for a workflow's latest run and queue upstream delivery.
///
/// Acknowledges with `202 Accepted` immediately; delivery is fire-and-forget.
/// Feedback on a run that already has feedback is ignored, first vote wins.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(submission): Json<FeedbackSubmission>,
) -> AppResult<impl IntoResponse> {
    let recorded = match state
        .executions
        .write()
        .await
        .get_mut(&submission.workflow_id)
    {
        Some(execution) => execution.record_feedback(submission.feedback),
        // No run to attach to; still forward the record upstream.
        None => true,
    };

    if recorded {
        state
            .feedback
            .submit(submission.workflow_id, submission.feedback);
        tracing::info!(
            workflow_id = %submission.workflow_id,
            feedback = ?submission.feedback,
            "Feedback accepted"
        );
    } else {
        tracing::debug!(
            workflow_id = %submission.workflow_id,
            "Duplicate feedback ignored"
        );
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse { data: "accepted" }),
    ))
}
