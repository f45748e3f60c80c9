/// All workflow template identifiers are UUID v4, assigned at creation.
pub type WorkflowId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
