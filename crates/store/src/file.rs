//! File-backed workflow store.
//!
//! Templates live in a single pretty-printed JSON document; timestamps
//! round-trip as ISO-8601 strings on disk and `DateTime<Utc>` in memory.
//! Every mutation rewrites the whole file under a lock, which is plenty for
//! a catalog measured in dozens of entries.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use flowdesk_core::error::CoreError;
use flowdesk_core::template::{CreateWorkflow, UpdateWorkflow, WorkflowTemplate};
use flowdesk_core::types::WorkflowId;

use crate::WorkflowStore;

pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles; without it two concurrent
    /// mutations could interleave their whole-file rewrites.
    lock: Mutex<()>,
}

impl FileStore {
    /// Open a store at `path`. A missing file reads as an empty catalog and
    /// is created on the first mutation.
    pub fn open(path: impl AsRef<Path>) -> Self {
        FileStore {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<WorkflowTemplate>, CoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                CoreError::Internal(format!(
                    "Corrupt workflow file {}: {e}",
                    self.path.display()
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(CoreError::Internal(format!(
                "Failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn persist(&self, templates: &[WorkflowTemplate]) -> Result<(), CoreError> {
        let json = serde_json::to_vec_pretty(templates)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize workflows: {e}")))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    CoreError::Internal(format!("Failed to create {}: {e}", parent.display()))
                })?;
            }
        }
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            CoreError::Internal(format!("Failed to write {}: {e}", self.path.display()))
        })
    }
}

#[async_trait::async_trait]
impl WorkflowStore for FileStore {
    async fn list(&self) -> Result<Vec<WorkflowTemplate>, CoreError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn get(&self, id: WorkflowId) -> Result<WorkflowTemplate, CoreError> {
        let _guard = self.lock.lock().await;
        self.load()
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(CoreError::NotFound {
                entity: "Workflow",
                id,
            })
    }

    async fn create(&self, input: CreateWorkflow) -> Result<WorkflowTemplate, CoreError> {
        crate::validate_create(&input)?;
        let _guard = self.lock.lock().await;
        let mut templates = self.load().await?;
        let template = WorkflowTemplate::create(input);
        templates.push(template.clone());
        self.persist(&templates).await?;
        tracing::debug!(id = %template.id, path = %self.path.display(), "Workflow created (file)");
        Ok(template)
    }

    async fn update(
        &self,
        id: WorkflowId,
        patch: UpdateWorkflow,
    ) -> Result<WorkflowTemplate, CoreError> {
        crate::validate_update(&patch)?;
        let _guard = self.lock.lock().await;
        let mut templates = self.load().await?;
        let template = templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::NotFound {
                entity: "Workflow",
                id,
            })?;
        template.apply_update(patch);
        let updated = template.clone();
        self.persist(&templates).await?;
        Ok(updated)
    }

    async fn delete(&self, id: WorkflowId) -> Result<(), CoreError> {
        let _guard = self.lock.lock().await;
        let mut templates = self.load().await?;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Err(CoreError::NotFound {
                entity: "Workflow",
                id,
            });
        }
        self.persist(&templates).await?;
        tracing::debug!(id = %id, path = %self.path.display(), "Workflow deleted (file)");
        Ok(())
    }
}
