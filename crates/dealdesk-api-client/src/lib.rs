//! Shared HTTP client for the deal-pipeline API.
//!
//! Provides a client with bearer-token auth and tenant scoping, generic
//! GET/POST/DELETE helpers whose failure path feeds the injected notifier,
//! domain methods (folders, documents, prospects, lookups), and the
//! [`HttpUploadTransport`] upload implementation. The CLI uses this client
//! directly; embedding UIs can too.

pub mod api;
pub mod upload;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use dealdesk_core::{ClientConfig, NoticeKind, Notifier};

/// Toast text when the server gives us nothing better.
pub const GENERIC_ERROR_NOTICE: &str = "Something went wrong, please try again";

/// API version prefix (e.g. "/api/v1"). Set DEALDESK_API_VERSION to match
/// the server.
pub fn api_prefix() -> String {
    let version = std::env::var("DEALDESK_API_VERSION").unwrap_or_else(|_| "v1".to_string());
    format!("/api/{}", version)
}

/// HTTP client for the deal-pipeline API.
///
/// Every request carries `Authorization: Bearer <token>` and, when a tenant
/// is configured, `X-Tenant-Id`. Credentials come from the injected
/// [`ClientConfig`] rather than any ambient store, so a client is fully
/// described by its constructor arguments.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            config,
            notifier,
        })
    }

    /// Create client from environment. See [`ClientConfig::from_env`] for the
    /// variables read.
    pub fn from_env(notifier: Arc<dyn Notifier>) -> Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config, notifier)
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header(
            "Authorization",
            format!("Bearer {}", self.config.bearer_token),
        );
        match self.config.tenant_id {
            Some(tenant_id) => request.header("X-Tenant-Id", tenant_id.to_string()),
            None => request,
        }
    }

    /// Uniform failure path for the JSON helpers: extract the server's
    /// message when there is one, emit a single error toast, and return the
    /// full detail as the error.
    fn request_failed(&self, status: Option<StatusCode>, body: &str) -> anyhow::Error {
        let notice = parse_error_message(body).unwrap_or_else(|| GENERIC_ERROR_NOTICE.to_string());
        self.notifier.notify(NoticeKind::Error, &notice);
        match status {
            Some(status) => {
                anyhow::anyhow!("API request failed with status {}: {}", status, notice)
            }
            None => anyhow::anyhow!("API request failed: {}", body),
        }
    }

    /// Decode a success body. A 2xx response that fails to parse is still a
    /// failed request from the caller's point of view, so it takes the same
    /// toast-and-error path as every other failure.
    fn decode_json<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        serde_json::from_str(body).map_err(|e| {
            self.request_failed(None, &format!("Failed to parse response as JSON: {}", e))
        })
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);
        request = self.apply_auth(request);

        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.request_failed(None, &e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.request_failed(Some(status), &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.request_failed(None, &e.to_string()))?;
        self.decode_json(&body)
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        let request = self.client.post(&url).json(body);
        let request = self.apply_auth(request);

        let response = request
            .send()
            .await
            .map_err(|e| self.request_failed(None, &e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.request_failed(Some(status), &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.request_failed(None, &e.to_string()))?;
        self.decode_json(&body)
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.build_url(path);
        let request = self.client.delete(&url);
        let request = self.apply_auth(request);

        let response = request
            .send()
            .await
            .map_err(|e| self.request_failed(None, &e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.request_failed(Some(status), &body));
        }

        Ok(())
    }

    /// Upload transport bound to this client's connection pool and config.
    pub fn upload_transport(&self) -> upload::HttpUploadTransport {
        upload::HttpUploadTransport::new(self.client.clone(), self.config.clone())
    }

    /// Raw client for custom requests. Caller must apply auth via build_url
    /// and headers.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Pull a human-readable message out of an API error body. The server
/// answers errors as `{"message": "..."}` (older endpoints use
/// `{"error": "..."}`); anything else yields `None`.
pub(crate) fn parse_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value
        .get("message")
        .or_else(|| value.get("error"))?
        .as_str()?
        .trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

// Re-export domain response types for convenience.
pub use dealdesk_core::models::{
    CreateFolderRequest, Currency, DocumentResponse, FolderResponse, Industry, ProspectFilter,
    ProspectKind, ProspectPage, ProspectSummary,
};
pub use upload::HttpUploadTransport;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_message_reads_message_field() {
        assert_eq!(
            parse_error_message(r#"{"message": "Folder not found"}"#),
            Some("Folder not found".to_string())
        );
    }

    #[test]
    fn parse_error_message_reads_legacy_error_field() {
        assert_eq!(
            parse_error_message(r#"{"error": "invalid token"}"#),
            Some("invalid token".to_string())
        );
    }

    #[test]
    fn parse_error_message_prefers_message_over_error() {
        assert_eq!(
            parse_error_message(r#"{"message": "primary", "error": "legacy"}"#),
            Some("primary".to_string())
        );
    }

    #[test]
    fn parse_error_message_rejects_unusable_bodies() {
        assert_eq!(parse_error_message("<html>502</html>"), None);
        assert_eq!(parse_error_message(""), None);
        assert_eq!(parse_error_message(r#"{"message": "   "}"#), None);
        assert_eq!(parse_error_message(r#"{"message": 42}"#), None);
        assert_eq!(parse_error_message(r#"{"detail": "other shape"}"#), None);
    }

    #[test]
    fn build_url_joins_base_and_path() {
        let config = ClientConfig::new("https://api.example.com/", "token");
        let client = ApiClient::new(config, Arc::new(dealdesk_core::MemoryNotifier::new()))
            .expect("client should build");
        assert_eq!(
            client.build_url("/api/v1/folders"),
            "https://api.example.com/api/v1/folders"
        );
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = ClientConfig::new("https://api.example.com", "");
        assert!(ApiClient::new(config, Arc::new(dealdesk_core::MemoryNotifier::new())).is_err());
    }

    #[test]
    fn decode_json_toasts_on_malformed_body() {
        let config = ClientConfig::new("https://api.example.com", "token");
        let notifier = Arc::new(dealdesk_core::MemoryNotifier::new());
        let client = ApiClient::new(config, notifier.clone()).expect("client should build");

        let decoded: Result<Vec<FolderResponse>> = client.decode_json("<html>bad gateway</html>");
        let err = decoded.err().expect("malformed body must fail");
        assert!(err.to_string().contains("Failed to parse response as JSON"));

        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Error);
        assert_eq!(notices[0].message, GENERIC_ERROR_NOTICE);

        let decoded: Result<Vec<FolderResponse>> = client.decode_json("[]");
        assert!(decoded.expect("valid body decodes").is_empty());
        assert_eq!(notifier.notices().len(), 1, "clean decode does not toast");
    }
}
