//! Workflow template persistence.
//!
//! [`WorkflowStore`] is the uniform CRUD contract every deployment shape
//! programs against; the three implementations are interchangeable:
//!
//! - [`MemoryStore`] — in-process, used by tests and demo deployments.
//! - [`FileStore`] — a plain JSON document on disk.
//! - [`RemoteStore`] — a client for another instance's HTTP surface.
//!
//! All operations are linearizable from the caller's point of view: a
//! successful mutation is visible to the very next read, and last write wins.

pub mod file;
pub mod memory;
pub mod remote;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use remote::RemoteStore;

use flowdesk_core::error::CoreError;
use flowdesk_core::template::{CreateWorkflow, UpdateWorkflow, WorkflowTemplate};
use flowdesk_core::types::WorkflowId;

/// CRUD contract for workflow templates.
///
/// `delete` of an already-deleted id is an error ([`CoreError::NotFound`]),
/// not a no-op — NotFound semantics are uniform across `get`, `update`, and
/// `delete`.
#[async_trait::async_trait]
pub trait WorkflowStore: Send + Sync {
    /// All templates, in stored order.
    async fn list(&self) -> Result<Vec<WorkflowTemplate>, CoreError>;

    /// A single template by id.
    async fn get(&self, id: WorkflowId) -> Result<WorkflowTemplate, CoreError>;

    /// Create a template from a partial, assigning a fresh id, `version = 1`,
    /// timestamps, and documented defaults for omitted fields.
    async fn create(&self, input: CreateWorkflow) -> Result<WorkflowTemplate, CoreError>;

    /// Shallow-merge a partial onto an existing template, refreshing
    /// `updated_at`.
    async fn update(
        &self,
        id: WorkflowId,
        patch: UpdateWorkflow,
    ) -> Result<WorkflowTemplate, CoreError>;

    /// Remove a template permanently. No soft-delete, no tombstone.
    async fn delete(&self, id: WorkflowId) -> Result<(), CoreError>;
}

/// Validate a create DTO before materializing it (name, description,
/// field-authoring rules). Shared by all store implementations.
pub(crate) fn validate_create(input: &CreateWorkflow) -> Result<(), CoreError> {
    flowdesk_core::validate::validate_workflow_name(&input.name)?;
    if let Some(description) = &input.description {
        flowdesk_core::validate::validate_description(description)?;
    }
    if let Some(fields) = &input.fields {
        flowdesk_core::validate::validate_fields(fields)?;
    }
    Ok(())
}

/// Validate an update DTO before applying it.
pub(crate) fn validate_update(patch: &UpdateWorkflow) -> Result<(), CoreError> {
    if let Some(name) = &patch.name {
        flowdesk_core::validate::validate_workflow_name(name)?;
    }
    if let Some(description) = &patch.description {
        flowdesk_core::validate::validate_description(description)?;
    }
    if let Some(fields) = &patch.fields {
        flowdesk_core::validate::validate_fields(fields)?;
    }
    Ok(())
}
