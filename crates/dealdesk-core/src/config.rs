//! Client configuration
//!
//! The original console read its credential and tenant identifiers from an
//! ambient persisted store on every request. Here that store is an explicit,
//! validated configuration object injected into the transport adapter at
//! construction time, so the upload session's dependencies stay visible and
//! testable. Writing the store (the login flow) is out of scope.

use std::env;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Credentials and scoping for the deal-pipeline backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin, e.g. "https://api.example.com". No trailing slash.
    pub base_url: String,
    /// Bearer credential attached to every outgoing request.
    pub bearer_token: String,
    /// Optional tenant scope; sent as a header and as an upload form field.
    pub tenant_id: Option<Uuid>,
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: bearer_token.into(),
            tenant_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_tenant(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Read configuration from the environment: DEALDESK_API_URL (or API_URL),
    /// DEALDESK_API_TOKEN (or API_TOKEN), optional DEALDESK_TENANT_ID and
    /// DEALDESK_TIMEOUT_SECS.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("DEALDESK_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let bearer_token = env::var("DEALDESK_API_TOKEN")
            .or_else(|_| env::var("API_TOKEN"))
            .map_err(|_| ConfigError::Missing("DEALDESK_API_TOKEN or API_TOKEN"))?;

        let tenant_id = match env::var("DEALDESK_TENANT_ID") {
            Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().parse::<Uuid>().map_err(|e| {
                ConfigError::Invalid(format!("DEALDESK_TENANT_ID is not a valid UUID: {e}"))
            })?),
            _ => None,
        };

        let timeout_secs = env::var("DEALDESK_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let config = ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
            tenant_id,
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bearer_token.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "bearer token must not be empty".to_string(),
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "base URL must be http(s), got {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
