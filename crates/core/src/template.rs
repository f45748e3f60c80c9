//! Workflow template: the authored, reusable definition of one form plus one
//! backend call, and the partial DTOs used to create and update it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::field::FieldSchema;
use crate::types::{Timestamp, WorkflowId};

/// Maximum length for a workflow name.
pub const MAX_WORKFLOW_NAME_LEN: usize = 200;

/// Maximum length for a workflow description.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// HTTP method of a workflow's target endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl HttpMethod {
    /// GET and HEAD requests never carry a body; form values travel in the
    /// query string instead.
    pub fn is_bodyless(self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Head)
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        HttpMethod::Post
    }
}

/// Gate for whether execution of a workflow is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Available,
    ComingSoon,
}

impl Default for WorkflowStatus {
    fn default() -> Self {
        WorkflowStatus::Available
    }
}

/// Invocation descriptor for a workflow's backend call.
///
/// `transform_request` / `transform_response` name hooks registered with the
/// engine's transform registry; templates stay plain serializable data and
/// an unknown hook name surfaces as a configuration error at execution time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// Target URL, absolute or relative. Must be non-empty before execution
    /// is attempted; an empty endpoint is a hard configuration error.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_response: Option<String>,
}

/// One executable workflow definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTemplate {
    pub id: WorkflowId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub status: WorkflowStatus,
    /// Ordered field list; order is the form's visual and step order.
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    #[serde(default)]
    pub api_config: ApiConfig,
    pub version: i32,
    #[serde(default)]
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: String,
}

/// DTO for creating a new workflow. Everything beyond the name is optional
/// and defaulted by [`WorkflowTemplate::create`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflow {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub status: Option<WorkflowStatus>,
    pub fields: Option<Vec<FieldSchema>>,
    pub api_config: Option<ApiConfig>,
    pub is_published: Option<bool>,
    pub created_by: Option<String>,
}

/// DTO for updating an existing workflow. All fields are optional; present
/// fields replace the stored value wholesale (shallow merge).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflow {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub status: Option<WorkflowStatus>,
    pub fields: Option<Vec<FieldSchema>>,
    pub api_config: Option<ApiConfig>,
    pub version: Option<i32>,
    pub is_published: Option<bool>,
}

impl WorkflowTemplate {
    /// Materialize a template from a create DTO: fresh UUID, `version = 1`,
    /// both timestamps set to now, fields defaulting to an empty list and
    /// the api config to `{endpoint: "", method: POST}`.
    pub fn create(input: CreateWorkflow) -> Self {
        let now = chrono::Utc::now();
        WorkflowTemplate {
            id: uuid::Uuid::new_v4(),
            name: input.name,
            description: input.description.unwrap_or_default(),
            category: input.category.unwrap_or_default(),
            icon: input.icon,
            status: input.status.unwrap_or_default(),
            fields: input.fields.unwrap_or_default(),
            api_config: input.api_config.unwrap_or_default(),
            version: 1,
            is_published: input.is_published.unwrap_or(false),
            created_at: now,
            updated_at: now,
            created_by: input.created_by.unwrap_or_else(|| "system".into()),
        }
    }

    /// Shallow-merge an update DTO onto this template, preserving `id` and
    /// `created_at`/`created_by` and refreshing `updated_at`.
    ///
    /// Shared by every store implementation so the merge semantics cannot
    /// drift between backends.
    pub fn apply_update(&mut self, patch: UpdateWorkflow) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(icon) = patch.icon {
            self.icon = Some(icon);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(fields) = patch.fields {
            self.fields = fields;
        }
        if let Some(api_config) = patch.api_config {
            self.api_config = api_config;
        }
        if let Some(version) = patch.version {
            self.version = version;
        }
        if let Some(is_published) = patch.is_published {
            self.is_published = is_published;
        }
        self.updated_at = chrono::Utc::now();
    }
}
