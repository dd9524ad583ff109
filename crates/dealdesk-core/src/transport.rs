//! Upload transport seam
//!
//! The upload session treats the network purely as an injected capability:
//! one cancellable multipart POST with a progress callback. The HTTP
//! implementation lives in `dealdesk-api-client`; tests script their own.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::file::SelectedFile;

/// Shared progress callback. Receives a raw percentage computed by the
/// transport from bytes written over total bytes; the session clamps it.
pub type ProgressFn = Arc<dyn Fn(f64) + Send + Sync>;

/// One upload attempt: target path, ordered file set, and the optional
/// folder association carried as a scalar multipart field.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Request path relative to the client's base URL, e.g. "/api/v1/documents".
    pub path: String,
    pub files: Vec<SelectedFile>,
    pub folder_id: Option<Uuid>,
}

impl UploadRequest {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size()).sum()
    }
}

/// What the session consumes from a successful upload response: success
/// itself plus an optional human-readable message. Nothing else of the body
/// is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReceipt {
    pub message: Option<String>,
}

/// Transport outcome taxonomy.
///
/// `Cancelled` is only ever produced in response to the session's own token
/// and is never surfaced to the user; every other variant is a genuine
/// failure.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("upload cancelled")]
    Cancelled,

    #[error("network error: {0}")]
    Network(String),

    #[error("server rejected upload (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid upload request: {0}")]
    Request(String),

    #[error("invalid server response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TransportError::Cancelled)
    }

    /// The text shown inline in the widget and in the error toast: the
    /// server-supplied message when one was present, a generic string
    /// otherwise. Never empty.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Rejected { message, .. } if !message.trim().is_empty() => {
                message.clone()
            }
            TransportError::Rejected { status, .. } => {
                format!("Upload rejected by the server (status {status})")
            }
            _ => "Upload failed, please try again".to_string(),
        }
    }
}

/// The injected upload capability.
///
/// Implementations must resolve with `TransportError::Cancelled` promptly
/// once `cancel` fires, and must invoke `on_progress` with non-decreasing
/// values for the duration of the attempt.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn send(
        &self,
        request: UploadRequest,
        on_progress: ProgressFn,
        cancel: CancellationToken,
    ) -> Result<UploadReceipt, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn user_message_prefers_server_message() {
        let err = TransportError::Rejected {
            status: 413,
            message: "File too large".to_string(),
        };
        assert_eq!(err.user_message(), "File too large");
    }

    #[test]
    fn user_message_falls_back_to_generic_text() {
        let err = TransportError::Rejected {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "Upload rejected by the server (status 500)"
        );

        let err = TransportError::Network("connection reset".to_string());
        assert_eq!(err.user_message(), "Upload failed, please try again");
        assert!(!err.user_message().is_empty());
    }

    #[test]
    fn only_cancelled_is_cancellation() {
        assert!(TransportError::Cancelled.is_cancellation());
        assert!(!TransportError::Network("x".into()).is_cancellation());
        assert!(!TransportError::InvalidResponse("x".into()).is_cancellation());
    }

    #[test]
    fn request_totals_sum_file_sizes() {
        let request = UploadRequest {
            path: "/api/v1/documents".to_string(),
            files: vec![
                SelectedFile::new("a.pdf", "application/pdf", Bytes::from(vec![0u8; 10])),
                SelectedFile::new("b.pdf", "application/pdf", Bytes::from(vec![0u8; 32])),
            ],
            folder_id: None,
        };
        assert_eq!(request.total_bytes(), 42);
    }
}
