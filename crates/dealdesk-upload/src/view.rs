//! Per-phase view data.
//!
//! One variant per phase instead of string-keyed configuration tables: the
//! compiler checks exhaustiveness, and [`render`] is a pure function of the
//! snapshot. Variants carry display data only, never behavior; hosts decide
//! what "render" means (the CLI prints, an embedding UI draws).

use dealdesk_core::{FileMeta, SessionSnapshot, UploadPhase};

/// What to show for the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseView {
    /// Nothing selected yet; show the file prompt.
    Idle { prompt: &'static str },
    /// Files picked, upload not started; show the listing and total size.
    Selected {
        files: Vec<FileMeta>,
        total_bytes: u64,
    },
    /// Attempt in flight; show the percent.
    Uploading { percent: u8 },
    /// Attempt landed; show the confirmation and the done affordance.
    Succeeded { message: String },
    /// Attempt failed; show the error inline with retry and dismiss.
    Failed { error: String },
}

const IDLE_PROMPT: &str = "Drop files here or browse to upload";
const FALLBACK_ERROR: &str = "Upload failed, please try again";

/// Render a snapshot into its per-phase view. Pure: same snapshot, same
/// view.
pub fn render(snapshot: &SessionSnapshot) -> PhaseView {
    match snapshot.phase {
        UploadPhase::Idle => PhaseView::Idle {
            prompt: IDLE_PROMPT,
        },
        UploadPhase::Selected => PhaseView::Selected {
            files: snapshot.files.clone(),
            total_bytes: snapshot.total_bytes(),
        },
        UploadPhase::Uploading => PhaseView::Uploading {
            percent: snapshot.progress,
        },
        UploadPhase::Succeeded => PhaseView::Succeeded {
            message: match snapshot.files.len() {
                1 => "1 file uploaded".to_string(),
                n => format!("{} files uploaded", n),
            },
        },
        UploadPhase::Failed => PhaseView::Failed {
            error: snapshot
                .error
                .clone()
                .unwrap_or_else(|| FALLBACK_ERROR.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str, size: u64) -> FileMeta {
        FileMeta {
            name: name.to_string(),
            content_type: "application/pdf".to_string(),
            size,
        }
    }

    fn snapshot(phase: UploadPhase) -> SessionSnapshot {
        SessionSnapshot {
            phase,
            files: vec![meta("a.pdf", 100), meta("b.pdf", 28)],
            progress: 0,
            error: None,
        }
    }

    #[test]
    fn idle_renders_prompt() {
        let view = render(&SessionSnapshot::idle());
        assert!(matches!(view, PhaseView::Idle { prompt } if !prompt.is_empty()));
    }

    #[test]
    fn selected_renders_listing_with_total() {
        match render(&snapshot(UploadPhase::Selected)) {
            PhaseView::Selected { files, total_bytes } => {
                assert_eq!(files.len(), 2);
                assert_eq!(total_bytes, 128);
            }
            other => panic!("expected Selected, got {:?}", other),
        }
    }

    #[test]
    fn uploading_renders_percent() {
        let mut snap = snapshot(UploadPhase::Uploading);
        snap.progress = 45;
        assert_eq!(render(&snap), PhaseView::Uploading { percent: 45 });
    }

    #[test]
    fn succeeded_message_counts_files() {
        let mut snap = snapshot(UploadPhase::Succeeded);
        match render(&snap) {
            PhaseView::Succeeded { message } => assert_eq!(message, "2 files uploaded"),
            other => panic!("expected Succeeded, got {:?}", other),
        }
        snap.files.truncate(1);
        match render(&snap) {
            PhaseView::Succeeded { message } => assert_eq!(message, "1 file uploaded"),
            other => panic!("expected Succeeded, got {:?}", other),
        }
    }

    #[test]
    fn failed_renders_error_with_fallback() {
        let mut snap = snapshot(UploadPhase::Failed);
        snap.error = Some("File too large".to_string());
        assert_eq!(
            render(&snap),
            PhaseView::Failed {
                error: "File too large".to_string()
            }
        );

        snap.error = None;
        match render(&snap) {
            PhaseView::Failed { error } => assert!(!error.is_empty()),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn render_is_pure() {
        let snap = snapshot(UploadPhase::Selected);
        assert_eq!(render(&snap), render(&snap));
    }
}
