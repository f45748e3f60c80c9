//! Post-run feedback capture.
//!
//! Feedback submission is fire-and-forget: the caller gets an immediate
//! acknowledgement and delivery happens in the background. A failed delivery
//! is logged, never surfaced to the user.

use chrono::Utc;
use flowdesk_core::types::WorkflowId;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Thumbs up or down on a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Positive,
    Negative,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRecord {
    workflow_id: WorkflowId,
    feedback: Feedback,
    submitted_at: flowdesk_core::types::Timestamp,
}

/// Sends feedback records to an optional upstream sink.
#[derive(Clone)]
pub struct FeedbackClient {
    http: Client,
    sink: Option<String>,
}

impl FeedbackClient {
    /// Client delivering to `sink`; `None` records feedback in the log only.
    pub fn new(http: Client, sink: Option<String>) -> Self {
        Self { http, sink }
    }

    /// Queue a feedback record for delivery and return immediately.
    pub fn submit(&self, workflow_id: WorkflowId, feedback: Feedback) {
        let record = FeedbackRecord {
            workflow_id,
            feedback,
            submitted_at: Utc::now(),
        };

        let Some(sink) = self.sink.clone() else {
            tracing::info!(workflow_id = %workflow_id, feedback = ?feedback, "feedback recorded");
            return;
        };

        let http = self.http.clone();
        tokio::spawn(async move {
            match http.post(&sink).json(&record).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(workflow_id = %record.workflow_id, "feedback delivered");
                }
                Ok(response) => {
                    tracing::warn!(
                        workflow_id = %record.workflow_id,
                        status = response.status().as_u16(),
                        "feedback sink rejected the record"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        workflow_id = %record.workflow_id,
                        error = %e,
                        "feedback delivery failed"
                    );
                }
            }
        });
    }
}
