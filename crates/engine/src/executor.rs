//! End-to-end execution of a single workflow run.
//!
//! A run walks four fixed steps: prepare (status gate, form resolution),
//! build the outbound request, execute it remotely, and classify the
//! response. Any step can fail; the run then carries the failure message in
//! its progress state instead of a result. Cancellation races the network
//! call, a cancelled run counts as failed.

use std::sync::Arc;

use flowdesk_core::progress::ExecutionProgress;
use flowdesk_core::template::{WorkflowStatus, WorkflowTemplate};
use flowdesk_core::types::WorkflowId;
use flowdesk_core::validate::{resolve_form, RawValue};
use reqwest::Client;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::classify::{classify, WorkflowResult};
use crate::error::EngineError;
use crate::feedback::Feedback;
use crate::object_url::ObjectStore;
use crate::request;
use crate::transform::TransformRegistry;

/// The record of one run, terminal once `progress` is completed or failed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub id: Uuid,
    pub workflow_id: WorkflowId,
    pub progress: ExecutionProgress,
    pub result: Option<WorkflowResult>,
    pub feedback: Option<Feedback>,
}

impl Execution {
    fn new(workflow_id: WorkflowId) -> Self {
        Execution {
            id: Uuid::new_v4(),
            workflow_id,
            progress: ExecutionProgress::new(),
            result: None,
            feedback: None,
        }
    }

    /// Record feedback once; later calls are ignored and return `false`.
    pub fn record_feedback(&mut self, feedback: Feedback) -> bool {
        if self.feedback.is_some() {
            return false;
        }
        self.feedback = Some(feedback);
        true
    }

    /// Clear result, feedback, and progress for a fresh run of the same
    /// workflow. Dropping the previous result releases any parked objects.
    pub fn reset(&mut self) {
        self.result = None;
        self.feedback = None;
        self.progress.reset();
    }
}

/// Runs workflows against their configured endpoints.
pub struct WorkflowExecutor {
    http: Client,
    objects: Arc<ObjectStore>,
    transforms: Arc<TransformRegistry>,
    base_url: Option<String>,
}

impl WorkflowExecutor {
    pub fn new(
        http: Client,
        objects: Arc<ObjectStore>,
        transforms: Arc<TransformRegistry>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            http,
            objects,
            transforms,
            base_url,
        }
    }

    pub fn objects(&self) -> &Arc<ObjectStore> {
        &self.objects
    }

    /// Run `template` with the submitted raw values. The returned execution
    /// is always terminal: completed with a classified result, or failed
    /// with the failure message in its progress state.
    pub async fn execute(
        &self,
        template: &WorkflowTemplate,
        raw: Vec<(String, RawValue)>,
        cancel: CancellationToken,
    ) -> Execution {
        let mut execution = Execution::new(template.id);

        match self.run(template, raw, cancel, &mut execution.progress).await {
            Ok(result) => {
                execution.progress.complete();
                tracing::info!(
                    workflow_id = %template.id,
                    execution_id = %execution.id,
                    result_kind = result.kind(),
                    "workflow run completed"
                );
                execution.result = Some(result);
            }
            Err(e) => {
                tracing::warn!(
                    workflow_id = %template.id,
                    execution_id = %execution.id,
                    step = execution.progress.current_step,
                    error = %e,
                    "workflow run failed"
                );
                execution.progress.fail(e.to_string());
            }
        }

        execution
    }

    async fn run(
        &self,
        template: &WorkflowTemplate,
        raw: Vec<(String, RawValue)>,
        cancel: CancellationToken,
        progress: &mut ExecutionProgress,
    ) -> Result<WorkflowResult, EngineError> {
        // Step 0: gate on status, resolve and validate the form.
        progress.start_step(0);
        if template.status == WorkflowStatus::ComingSoon {
            return Err(EngineError::Configuration(format!(
                "Workflow '{}' is not yet available",
                template.name
            )));
        }
        let form = resolve_form(template, raw)
            .map_err(|e| EngineError::Request(e.to_string()))?;

        // Step 1: assemble the outbound request.
        progress.start_step(1);
        let request = request::build(
            &self.http,
            &template.api_config,
            form,
            &self.transforms,
            self.base_url.as_deref(),
        )?;

        // Step 2: execute remotely, racing cancellation.
        progress.start_step(2);
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(EngineError::Cancelled),
            outcome = self.http.execute(request) => outcome
                .map_err(|e| EngineError::Transport(format!("Request failed: {e}")))?,
        };

        // Step 3: classify the response into a renderable result.
        progress.start_step(3);
        let hook = self
            .transforms
            .response_hook(template.api_config.transform_response.as_deref())?;
        classify(&self.objects, response, hook.as_ref()).await
    }
}
