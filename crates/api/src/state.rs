use std::collections::HashMap;
use std::sync::Arc;

use flowdesk_core::types::WorkflowId;
use flowdesk_engine::{Execution, FeedbackClient, ObjectStore, WorkflowExecutor};
use flowdesk_store::WorkflowStore;
use tokio::sync::RwLock;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Workflow template store (memory, file, or remote).
    pub store: Arc<dyn WorkflowStore>,
    /// Workflow executor.
    pub executor: Arc<WorkflowExecutor>,
    /// Byte store backing binary results served at `/api/v1/objects/{id}`.
    pub objects: Arc<ObjectStore>,
    /// Feedback delivery client.
    pub feedback: FeedbackClient,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Latest execution per workflow. A new run replaces the previous entry;
    /// dropping the old execution releases its parked result objects.
    pub executions: Arc<RwLock<HashMap<WorkflowId, Execution>>>,
}
