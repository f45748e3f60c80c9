//! Remote workflow store: a client for another instance's HTTP surface.
//!
//! Speaks the `/workflows` CRUD routes and unwraps the standard
//! `{ "data": ... }` envelope. A 404 from the remote maps to
//! [`CoreError::NotFound`] so callers can tell "no such workflow" apart from
//! transport failures.

use serde::Deserialize;

use flowdesk_core::error::CoreError;
use flowdesk_core::template::{CreateWorkflow, UpdateWorkflow, WorkflowTemplate};
use flowdesk_core::types::WorkflowId;

use crate::WorkflowStore;

pub struct RemoteStore {
    http: reqwest::Client,
    /// Base URL up to and including the API prefix, e.g.
    /// `http://workflows.internal/api/v1`.
    base_url: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

impl RemoteStore {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        RemoteStore {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/workflows{suffix}", self.base_url)
    }

    /// Map a non-success response to the store error taxonomy.
    async fn check(
        response: reqwest::Response,
        id: Option<WorkflowId>,
    ) -> Result<reqwest::Response, CoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(CoreError::NotFound {
                    entity: "Workflow",
                    id,
                });
            }
        }
        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(CoreError::Validation(body));
        }
        Err(CoreError::Internal(format!(
            "Remote store returned {status}: {body}"
        )))
    }

    fn transport(e: reqwest::Error) -> CoreError {
        CoreError::Internal(format!("Remote store request failed: {e}"))
    }
}

#[async_trait::async_trait]
impl WorkflowStore for RemoteStore {
    async fn list(&self) -> Result<Vec<WorkflowTemplate>, CoreError> {
        let response = self
            .http
            .get(self.url(""))
            .send()
            .await
            .map_err(Self::transport)?;
        let envelope: Envelope<Vec<WorkflowTemplate>> = Self::check(response, None)
            .await?
            .json()
            .await
            .map_err(Self::transport)?;
        Ok(envelope.data)
    }

    async fn get(&self, id: WorkflowId) -> Result<WorkflowTemplate, CoreError> {
        let response = self
            .http
            .get(self.url(&format!("/{id}")))
            .send()
            .await
            .map_err(Self::transport)?;
        let envelope: Envelope<WorkflowTemplate> = Self::check(response, Some(id))
            .await?
            .json()
            .await
            .map_err(Self::transport)?;
        Ok(envelope.data)
    }

    async fn create(&self, input: CreateWorkflow) -> Result<WorkflowTemplate, CoreError> {
        crate::validate_create(&input)?;
        let response = self
            .http
            .post(self.url(""))
            .json(&input)
            .send()
            .await
            .map_err(Self::transport)?;
        let envelope: Envelope<WorkflowTemplate> = Self::check(response, None)
            .await?
            .json()
            .await
            .map_err(Self::transport)?;
        Ok(envelope.data)
    }

    async fn update(
        &self,
        id: WorkflowId,
        patch: UpdateWorkflow,
    ) -> Result<WorkflowTemplate, CoreError> {
        crate::validate_update(&patch)?;
        let response = self
            .http
            .put(self.url(&format!("/{id}")))
            .json(&patch)
            .send()
            .await
            .map_err(Self::transport)?;
        let envelope: Envelope<WorkflowTemplate> = Self::check(response, Some(id))
            .await?
            .json()
            .await
            .map_err(Self::transport)?;
        Ok(envelope.data)
    }

    async fn delete(&self, id: WorkflowId) -> Result<(), CoreError> {
        let response = self
            .http
            .delete(self.url(&format!("/{id}")))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }
}
