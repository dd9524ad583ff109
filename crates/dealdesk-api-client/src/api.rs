//! Domain methods for the deal-pipeline API client.
//!
//! Response types live in `dealdesk_core::models`; every method here is a
//! thin pass-through from typed arguments to the generic HTTP helpers.

use anyhow::Result;
use uuid::Uuid;

use crate::{api_prefix, ApiClient};
use dealdesk_core::models::{
    CreateFolderRequest, Currency, DocumentResponse, FolderResponse, Industry, ProspectFilter,
    ProspectKind, ProspectPage,
};

/// Path of the multipart document-upload endpoint, shared with the upload
/// transport. POST `files[]` parts plus optional `folder_id` / `tenant_id`
/// scalar fields.
pub fn upload_documents_path() -> String {
    format!("{}/documents", api_prefix())
}

impl ApiClient {
    /// List folders, optionally scoped to one parent (root level when None).
    pub async fn list_folders(&self, parent_id: Option<Uuid>) -> Result<Vec<FolderResponse>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(pid) = parent_id {
            query.push(("parent_id", pid.to_string()));
        }
        self.get(&format!("{}/folders", api_prefix()), &query).await
    }

    /// Create a folder with optional parent.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> Result<FolderResponse> {
        let body = CreateFolderRequest {
            name: name.to_string(),
            parent_id,
        };
        self.post_json(&format!("{}/folders", api_prefix()), &body)
            .await
    }

    /// List documents with pagination and optional folder filter.
    pub async fn list_documents(
        &self,
        limit: i64,
        offset: i64,
        folder_id: Option<Uuid>,
    ) -> Result<Vec<DocumentResponse>> {
        let mut query = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
        if let Some(fid) = folder_id {
            query.push(("folder_id", fid.to_string()));
        }
        self.get(&format!("{}/documents", api_prefix()), &query)
            .await
    }

    /// Delete a document by ID.
    pub async fn delete_document(&self, document_id: Uuid) -> Result<()> {
        self.delete(&format!("{}/documents/{}", api_prefix(), document_id))
            .await
    }

    /// List prospects of one kind with search, dropdown filters, and
    /// pagination.
    pub async fn list_prospects(
        &self,
        kind: ProspectKind,
        filter: &ProspectFilter,
    ) -> Result<ProspectPage> {
        let query = filter.to_query();
        self.get(
            &format!("{}/prospects/{}", api_prefix(), kind.as_str()),
            &query,
        )
        .await
    }

    /// Industry options for the prospect filter dropdown.
    pub async fn list_industries(&self) -> Result<Vec<Industry>> {
        self.get(&format!("{}/industries", api_prefix()), &[]).await
    }

    /// Currency options for the prospect filter dropdown.
    pub async fn list_currencies(&self) -> Result<Vec<Currency>> {
        self.get(&format!("{}/currencies", api_prefix()), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_path_is_under_api_prefix() {
        let path = upload_documents_path();
        assert!(path.starts_with("/api/"));
        assert!(path.ends_with("/documents"));
    }
}
