use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Folder for organizing deal documents hierarchically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderResponse {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub document_count: Option<i64>,
}

/// Request DTO for creating a new folder.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
}

impl CreateFolderRequest {
    pub fn new(name: impl Into<String>) -> Self {
        CreateFolderRequest {
            name: name.into(),
            parent_id: None,
        }
    }
}
