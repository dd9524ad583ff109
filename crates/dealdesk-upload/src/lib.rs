//! Upload session state machine.
//!
//! An [`UploadSession`] owns one file-selection/upload lifecycle: idle,
//! selected, uploading, succeeded, failed. It drives an injected
//! [`UploadTransport`](dealdesk_core::UploadTransport), publishes every state
//! change as a [`SessionSnapshot`](dealdesk_core::SessionSnapshot) over a
//! watch channel, and reports failures through the injected notifier. The
//! [`view`] module renders snapshots into per-phase view data.

pub mod session;
pub mod view;

pub use session::{FilesChangedFn, UploadSession, UploadTarget};
pub use view::{render, PhaseView};
