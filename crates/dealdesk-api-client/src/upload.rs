//! HTTP implementation of the upload transport seam.
//!
//! One multipart POST per attempt: a repeated `files[]` part for every
//! selected file (filename and MIME type preserved), plus `folder_id` and
//! `tenant_id` scalar fields when configured. Each part streams its bytes in
//! 64 KiB chunks through a counting wrapper so the caller sees progress while
//! the request body is being written, and the whole request races the
//! session's cancellation token.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use dealdesk_core::{
    ClientConfig, ProgressFn, TransportError, UploadReceipt, UploadRequest, UploadTransport,
};

use crate::parse_error_message;

const CHUNK_SIZE: usize = 64 * 1024;

/// Success body of the upload endpoint. Only the optional message is
/// interpreted; an empty or non-JSON body is treated as a bare success.
#[derive(Debug, Deserialize)]
struct UploadAck {
    #[serde(default)]
    message: Option<String>,
}

/// Upload transport over reqwest. Obtained from
/// [`ApiClient::upload_transport`](crate::ApiClient::upload_transport) to
/// share the client's connection pool, or built standalone from a config.
#[derive(Clone)]
pub struct HttpUploadTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpUploadTransport {
    pub fn new(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn from_config(config: ClientConfig) -> anyhow::Result<Self> {
        use anyhow::Context;
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self::new(client, config))
    }

    fn build_form(
        &self,
        request: &UploadRequest,
        on_progress: &ProgressFn,
    ) -> Result<Form, TransportError> {
        let total = request.total_bytes();
        let sent = Arc::new(AtomicU64::new(0));

        let mut form = Form::new();
        for file in &request.files {
            let stream = progress_stream(
                file.data.clone(),
                Arc::clone(&sent),
                total,
                Arc::clone(on_progress),
            );
            let part = Part::stream_with_length(Body::wrap_stream(stream), file.size())
                .file_name(file.name.clone())
                .mime_str(&file.content_type)
                .map_err(|e| {
                    TransportError::Request(format!(
                        "invalid content type {:?} for {}: {}",
                        file.content_type, file.name, e
                    ))
                })?;
            form = form.part("files[]", part);
        }

        if let Some(folder_id) = request.folder_id {
            form = form.text("folder_id", folder_id.to_string());
        }
        if let Some(tenant_id) = self.config.tenant_id {
            form = form.text("tenant_id", tenant_id.to_string());
        }

        Ok(form)
    }
}

#[async_trait]
impl UploadTransport for HttpUploadTransport {
    async fn send(
        &self,
        request: UploadRequest,
        on_progress: ProgressFn,
        cancel: CancellationToken,
    ) -> Result<UploadReceipt, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        let url = format!("{}{}", self.config.base_url, request.path);
        let file_count = request.files.len();
        let total_bytes = request.total_bytes();
        let form = self.build_form(&request, &on_progress)?;

        let mut builder = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.bearer_token),
            )
            .multipart(form);
        if let Some(tenant_id) = self.config.tenant_id {
            builder = builder.header("X-Tenant-Id", tenant_id.to_string());
        }

        tracing::info!(file_count, total_bytes, url = %url, "Starting upload");
        let started = std::time::Instant::now();

        let attempt = async {
            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

            if !status.is_success() {
                tracing::warn!(status = %status, body = %body, "Upload rejected");
                return Err(TransportError::Rejected {
                    status: status.as_u16(),
                    message: parse_error_message(&body).unwrap_or_default(),
                });
            }

            tracing::info!(
                status = %status,
                file_count,
                total_bytes,
                duration_ms = started.elapsed().as_millis() as u64,
                "Upload complete"
            );
            Ok(parse_receipt(&body))
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(file_count, "Upload cancelled");
                Err(TransportError::Cancelled)
            }
            result = attempt => result,
        }
    }
}

/// Split one file's bytes into fixed-size chunks, bumping the shared byte
/// counter and reporting overall percent as each chunk is pulled into the
/// request body. Slicing `Bytes` shares the underlying buffer.
fn progress_stream(
    data: Bytes,
    sent: Arc<AtomicU64>,
    total: u64,
    on_progress: ProgressFn,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(CHUNK_SIZE)
        .map(|start| data.slice(start..data.len().min(start + CHUNK_SIZE)))
        .collect();

    futures::stream::iter(chunks.into_iter().map(move |chunk| {
        let written = sent.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
        let percent = written as f64 * 100.0 / total.max(1) as f64;
        on_progress(percent);
        Ok(chunk)
    }))
}

fn parse_receipt(body: &str) -> UploadReceipt {
    let message = serde_json::from_str::<UploadAck>(body)
        .ok()
        .and_then(|ack| ack.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    UploadReceipt { message }
}
