use serde::{Deserialize, Serialize};

use crate::file::FileMeta;

/// Lifecycle phase of an upload session.
///
/// Every phase loops back to [`Idle`](UploadPhase::Idle) through an explicit
/// action; `Succeeded` and `Failed` wait for user acknowledgement rather than
/// expiring on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    Idle,
    Selected,
    Uploading,
    Succeeded,
    Failed,
}

impl UploadPhase {
    /// Whether `start_upload` is permitted from this phase.
    pub fn can_start(self) -> bool {
        matches!(self, UploadPhase::Selected | UploadPhase::Failed)
    }

    /// Whether a transport attempt is currently in flight.
    pub fn is_uploading(self) -> bool {
        matches!(self, UploadPhase::Uploading)
    }
}

/// Point-in-time view of an upload session, published on every transition.
///
/// Holds file metadata only; the file bytes stay inside the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: UploadPhase,
    pub files: Vec<FileMeta>,
    /// Percentage in 0–100. Meaningful only while `phase` is `Uploading`;
    /// reset to 0 on entering `Selected` or `Failed`, forced to 100 on
    /// `Succeeded`.
    pub progress: u8,
    pub error: Option<String>,
}

impl SessionSnapshot {
    /// The empty idle snapshot every session starts from and returns to.
    pub fn idle() -> Self {
        SessionSnapshot {
            phase: UploadPhase::Idle,
            files: Vec::new(),
            progress: 0,
            error: None,
        }
    }

    /// Sum of the selected files' sizes in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Clamp a raw transport-reported percentage into 0–100.
///
/// The transport computes percentages from counted bytes and a possibly wrong
/// total, so out-of-range and non-finite inputs are tolerated here rather
/// than trusted there.
pub fn clamp_percent(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u8
}
