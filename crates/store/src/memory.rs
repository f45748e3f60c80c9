//! In-memory workflow store.

use tokio::sync::RwLock;

use flowdesk_core::error::CoreError;
use flowdesk_core::field::{FieldSchema, FieldType, ValidationRules};
use flowdesk_core::template::{
    ApiConfig, CreateWorkflow, HttpMethod, UpdateWorkflow, WorkflowTemplate,
};
use flowdesk_core::types::WorkflowId;

use crate::WorkflowStore;

/// Process-local store backed by a `RwLock`ed vector. Order of insertion is
/// the listing order.
#[derive(Default)]
pub struct MemoryStore {
    templates: RwLock<Vec<WorkflowTemplate>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the stock workflow catalog.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut guard = store
                .templates
                .try_write()
                .expect("fresh store is uncontended");
            for template in stock_catalog() {
                guard.push(template);
            }
        }
        store
    }
}

#[async_trait::async_trait]
impl WorkflowStore for MemoryStore {
    async fn list(&self) -> Result<Vec<WorkflowTemplate>, CoreError> {
        Ok(self.templates.read().await.clone())
    }

    async fn get(&self, id: WorkflowId) -> Result<WorkflowTemplate, CoreError> {
        self.templates
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "Workflow",
                id,
            })
    }

    async fn create(&self, input: CreateWorkflow) -> Result<WorkflowTemplate, CoreError> {
        crate::validate_create(&input)?;
        let template = WorkflowTemplate::create(input);
        self.templates.write().await.push(template.clone());
        tracing::debug!(id = %template.id, name = %template.name, "Workflow created (memory)");
        Ok(template)
    }

    async fn update(
        &self,
        id: WorkflowId,
        patch: UpdateWorkflow,
    ) -> Result<WorkflowTemplate, CoreError> {
        crate::validate_update(&patch)?;
        let mut guard = self.templates.write().await;
        let template = guard
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::NotFound {
                entity: "Workflow",
                id,
            })?;
        template.apply_update(patch);
        Ok(template.clone())
    }

    async fn delete(&self, id: WorkflowId) -> Result<(), CoreError> {
        let mut guard = self.templates.write().await;
        let before = guard.len();
        guard.retain(|t| t.id != id);
        if guard.len() == before {
            return Err(CoreError::NotFound {
                entity: "Workflow",
                id,
            });
        }
        tracing::debug!(id = %id, "Workflow deleted (memory)");
        Ok(())
    }
}

/// The stock catalog shipped with a fresh deployment: CV analysis and the
/// IT helper, matching the product's original launch set.
pub fn stock_catalog() -> Vec<WorkflowTemplate> {
    let cv_analysis = {
        let mut t = WorkflowTemplate::create(CreateWorkflow {
            name: "CV Analysis".into(),
            description: Some("Analyze CVs and extract key information".into()),
            category: Some("HR".into()),
            icon: Some("/icons/cv.png".into()),
            status: None,
            fields: None,
            api_config: Some(ApiConfig {
                endpoint: "/api/analyze-cv".into(),
                method: HttpMethod::Post,
                ..Default::default()
            }),
            is_published: Some(true),
            created_by: None,
        });
        t.fields = vec![FieldSchema {
            id: "cv-upload".into(),
            name: Some("cvFile".into()),
            label: "Upload CV".into(),
            field_type: FieldType::File,
            placeholder: None,
            required: true,
            default_value: None,
            validation: ValidationRules {
                file_types: Some(vec![".pdf".into(), ".doc".into(), ".docx".into()]),
                ..Default::default()
            },
            visualize_file: true,
        }];
        t
    };

    let it_helper = {
        let mut t = WorkflowTemplate::create(CreateWorkflow {
            name: "IT Helper".into(),
            description: Some("Get AI assistance for IT issues".into()),
            category: Some("Support".into()),
            icon: Some("/icons/it.png".into()),
            status: None,
            fields: None,
            api_config: Some(ApiConfig {
                endpoint: "/api/it-helper".into(),
                method: HttpMethod::Post,
                ..Default::default()
            }),
            is_published: Some(true),
            created_by: None,
        });
        t.fields = vec![FieldSchema {
            id: "problem".into(),
            name: Some("problem".into()),
            label: "Describe your IT issue".into(),
            field_type: FieldType::Textarea,
            placeholder: None,
            required: true,
            default_value: None,
            validation: ValidationRules::default(),
            visualize_file: false,
        }];
        t
    };

    vec![cv_analysis, it_helper]
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn create_input(name: &str) -> CreateWorkflow {
        CreateWorkflow {
            name: name.into(),
            description: Some("desc".into()),
            category: Some("Test".into()),
            icon: None,
            status: None,
            fields: None,
            api_config: None,
            is_published: None,
            created_by: Some("tester".into()),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips_without_dropping_fields() {
        let store = MemoryStore::new();
        let created = store.create(create_input("Round Trip")).await.unwrap();
        let fetched = store.get(created.id).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.name, "Round Trip");
        assert_eq!(fetched.description, "desc");
        assert_eq!(fetched.category, "Test");
        assert_eq!(fetched.created_by, "tester");
        assert_eq!(fetched.version, 1);
        // Omitted fields pick up documented defaults.
        assert!(fetched.fields.is_empty());
        assert_eq!(fetched.api_config.endpoint, "");
        assert_eq!(fetched.api_config.method, HttpMethod::Post);
    }

    #[tokio::test]
    async fn mutations_are_visible_to_the_next_read() {
        let store = MemoryStore::new();
        let created = store.create(create_input("Visible")).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);

        store
            .update(
                created.id,
                UpdateWorkflow {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(store.get(created.id).await.unwrap().name, "Renamed");

        store.delete(created.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_twice_fails_the_second_time() {
        let store = MemoryStore::new();
        let created = store.create(create_input("Doomed")).await.unwrap();

        store.delete(created.id).await.unwrap();
        assert_matches!(
            store.delete(created.id).await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        assert_matches!(
            store
                .update(uuid::Uuid::new_v4(), UpdateWorkflow::default())
                .await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn create_rejects_empty_name() {
        let store = MemoryStore::new();
        assert_matches!(
            store.create(create_input("")).await,
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn seeded_store_carries_the_stock_catalog() {
        let store = MemoryStore::seeded();
        let all = store.list().await.unwrap();
        let names: Vec<_> = all.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["CV Analysis", "IT Helper"]);
        assert!(all[0].fields[0].visualize_file);
    }
}
