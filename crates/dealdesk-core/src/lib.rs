//! Dealdesk Core Library
//!
//! This crate provides the shared types used across the dealdesk client
//! toolkit: the upload session model (phases, snapshots, selected files),
//! the transport and notifier seams, client configuration, and the REST
//! response models for the deal-pipeline backend.

pub mod config;
pub mod file;
pub mod models;
pub mod notify;
pub mod phase;
pub mod transport;

// Re-export commonly used types
pub use config::{ClientConfig, ConfigError};
pub use file::{FileMeta, SelectedFile};
pub use notify::{MemoryNotifier, Notice, NoticeKind, Notifier, TracingNotifier};
pub use phase::{clamp_percent, SessionSnapshot, UploadPhase};
pub use transport::{
    ProgressFn, TransportError, UploadReceipt, UploadRequest, UploadTransport,
};
