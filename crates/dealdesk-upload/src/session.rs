//! The upload session state machine.
//!
//! One session owns one lifecycle: select files, start a cancellable upload
//! attempt, observe progress, land in succeeded or failed, return to idle.
//! All guards run synchronously under the session lock, so two rapid
//! `start_upload` calls can never race into two in-flight attempts. Each
//! attempt carries a monotonically increasing id; progress and completion
//! callbacks from a superseded attempt are dropped.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use dealdesk_core::{
    clamp_percent, FileMeta, NoticeKind, Notifier, ProgressFn, SelectedFile, SessionSnapshot,
    TransportError, UploadPhase, UploadReceipt, UploadRequest, UploadTransport,
};

/// Observer invoked with the new file metadata whenever the selection
/// changes.
pub type FilesChangedFn = Arc<dyn Fn(&[FileMeta]) + Send + Sync>;

/// Where a session posts its files: the endpoint path and the optional
/// folder the documents land in.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub path: String,
    pub folder_id: Option<Uuid>,
}

impl UploadTarget {
    pub fn new(path: impl Into<String>) -> Self {
        UploadTarget {
            path: path.into(),
            folder_id: None,
        }
    }

    pub fn with_folder(mut self, folder_id: Uuid) -> Self {
        self.folder_id = Some(folder_id);
        self
    }
}

struct SessionState {
    phase: UploadPhase,
    files: Vec<SelectedFile>,
    progress: u8,
    error: Option<String>,
    /// Id of the most recent attempt. Bumped on every start; callbacks
    /// carrying an older id are stale.
    attempt: u64,
    /// Token of the in-flight attempt. `Some` exactly while `Uploading`.
    cancel: Option<CancellationToken>,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            files: self.files.iter().map(|f| f.meta()).collect(),
            progress: self.progress,
            error: self.error.clone(),
        }
    }
}

struct SessionShared {
    state: Mutex<SessionState>,
    publisher: watch::Sender<SessionSnapshot>,
    transport: Arc<dyn UploadTransport>,
    notifier: Arc<dyn Notifier>,
    target: UploadTarget,
    on_files_changed: Mutex<Option<FilesChangedFn>>,
}

impl SessionShared {
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        // State mutations are plain field writes; a poisoned lock still
        // holds a coherent state.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &SessionState) {
        self.publisher.send_replace(state.snapshot());
    }

    fn files_observer(&self) -> Option<FilesChangedFn> {
        self.on_files_changed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record_progress(&self, attempt_id: u64, raw: f64) {
        let mut state = self.lock_state();
        if state.attempt != attempt_id || state.phase != UploadPhase::Uploading {
            return;
        }
        let clamped = clamp_percent(raw);
        if clamped == state.progress {
            return;
        }
        state.progress = clamped;
        self.publish(&state);
    }

    fn complete_attempt(&self, attempt_id: u64, result: Result<UploadReceipt, TransportError>) {
        let mut state = self.lock_state();
        if state.attempt != attempt_id || state.phase != UploadPhase::Uploading {
            tracing::debug!(
                attempt = attempt_id,
                "Dropping outcome of a superseded upload attempt"
            );
            return;
        }
        state.cancel = None;

        match result {
            Ok(receipt) => {
                state.phase = UploadPhase::Succeeded;
                state.progress = 100;
                state.error = None;
                tracing::info!(
                    attempt = attempt_id,
                    file_count = state.files.len(),
                    message = receipt.message.as_deref().unwrap_or(""),
                    "Upload succeeded"
                );
                self.publish(&state);
            }
            Err(err) if err.is_cancellation() => {
                // Only this session's own token produces Cancelled. Reaching
                // here means the token fired without a state transition (the
                // handle was dropped mid-flight); finish the same silent
                // return to idle that cancel() performs.
                state.phase = UploadPhase::Idle;
                state.files.clear();
                state.progress = 0;
                state.error = None;
                self.publish(&state);
            }
            Err(err) => {
                let message = err.user_message();
                state.phase = UploadPhase::Failed;
                state.progress = 0;
                state.error = Some(message.clone());
                tracing::warn!(attempt = attempt_id, error = %err, "Upload failed");
                self.publish(&state);
                drop(state);
                self.notifier.notify(NoticeKind::Error, &message);
            }
        }
    }

    fn clear_to_idle(&self, action: &'static str) {
        let mut state = self.lock_state();
        self.clear_locked(&mut state, action);
    }

    fn clear_locked(&self, state: &mut SessionState, action: &'static str) {
        if let Some(token) = state.cancel.take() {
            token.cancel();
        }
        if state.phase == UploadPhase::Idle {
            return;
        }
        tracing::info!(action, phase = ?state.phase, "Upload session cleared");
        state.phase = UploadPhase::Idle;
        state.files.clear();
        state.progress = 0;
        state.error = None;
        self.publish(state);
    }
}

/// One upload lifecycle over an injected transport.
///
/// The session publishes every state change as a snapshot over a watch
/// channel; hosts render from [`subscribe`](UploadSession::subscribe) or poll
/// [`snapshot`](UploadSession::snapshot). Failures surface as the `Failed`
/// phase plus one error toast through the injected notifier; a cancelled
/// attempt is silent. Dropping the session cancels any in-flight attempt.
pub struct UploadSession {
    shared: Arc<SessionShared>,
}

impl UploadSession {
    pub fn new(
        transport: Arc<dyn UploadTransport>,
        notifier: Arc<dyn Notifier>,
        target: UploadTarget,
    ) -> Self {
        let (publisher, _) = watch::channel(SessionSnapshot::idle());
        UploadSession {
            shared: Arc::new(SessionShared {
                state: Mutex::new(SessionState {
                    phase: UploadPhase::Idle,
                    files: Vec::new(),
                    progress: 0,
                    error: None,
                    attempt: 0,
                    cancel: None,
                }),
                publisher,
                transport,
                notifier,
                target,
                on_files_changed: Mutex::new(None),
            }),
        }
    }

    /// Register the files-changed observer. Replaces any previous one.
    pub fn set_files_observer(&self, observer: FilesChangedFn) {
        *self
            .shared
            .on_files_changed
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(observer);
    }

    /// Replace the selection. Ignored for an empty list and while an upload
    /// is in flight; from any other phase the session enters `Selected` with
    /// progress and error cleared, and the files-changed observer fires.
    pub fn select_files(&self, files: Vec<SelectedFile>) {
        if files.is_empty() {
            tracing::debug!("Ignoring empty file selection");
            return;
        }
        let metas: Vec<FileMeta> = {
            let mut state = self.shared.lock_state();
            if state.phase.is_uploading() {
                tracing::debug!("File selection ignored while an upload is in flight");
                return;
            }
            state.files = files;
            state.phase = UploadPhase::Selected;
            state.progress = 0;
            state.error = None;
            self.shared.publish(&state);
            state.files.iter().map(|f| f.meta()).collect()
        };
        tracing::info!(file_count = metas.len(), "Files selected");
        if let Some(observer) = self.shared.files_observer() {
            observer(&metas);
        }
    }

    /// Begin an upload attempt with the current selection. Returns whether
    /// one began: only `Selected` and `Failed` (retry) may start; from
    /// `Idle`, `Uploading`, and `Succeeded` this is a no-op. The guard is
    /// atomic under the session lock.
    ///
    /// Must be called from within a Tokio runtime; the attempt runs as a
    /// spawned task.
    pub fn start_upload(&self) -> bool {
        let (request, attempt_id, cancel_token) = {
            let mut state = self.shared.lock_state();
            if !state.phase.can_start() {
                tracing::debug!(phase = ?state.phase, "Upload start ignored");
                return false;
            }
            state.attempt += 1;
            state.phase = UploadPhase::Uploading;
            state.progress = 0;
            state.error = None;
            let token = CancellationToken::new();
            state.cancel = Some(token.clone());
            self.shared.publish(&state);

            let request = UploadRequest {
                path: self.shared.target.path.clone(),
                files: state.files.clone(),
                folder_id: self.shared.target.folder_id,
            };
            (request, state.attempt, token)
        };

        tracing::info!(
            attempt = attempt_id,
            file_count = request.files.len(),
            total_bytes = request.total_bytes(),
            "Upload started"
        );

        let progress_shared = Arc::clone(&self.shared);
        let on_progress: ProgressFn =
            Arc::new(move |raw| progress_shared.record_progress(attempt_id, raw));

        let task_shared = Arc::clone(&self.shared);
        let transport = Arc::clone(&self.shared.transport);
        tokio::spawn(async move {
            let result = transport.send(request, on_progress, cancel_token).await;
            task_shared.complete_attempt(attempt_id, result);
        });
        true
    }

    /// Abort any in-flight attempt and return to `Idle` with files, error,
    /// and progress cleared. Safe from every phase; a no-op when already
    /// idle. The aborted attempt resolves silently.
    pub fn cancel(&self) {
        self.shared.clear_to_idle("cancel");
    }

    /// Teardown path: identical clearing to [`cancel`](UploadSession::cancel),
    /// including aborting an in-flight attempt.
    pub fn reset(&self) {
        self.shared.clear_to_idle("reset");
    }

    /// Acknowledge and clear: from `Selected`, `Succeeded`, or `Failed` the
    /// session returns to `Idle` with files, error, and progress cleared.
    /// Unlike [`cancel`](UploadSession::cancel) it never aborts an in-flight
    /// attempt; while `Uploading` it is ignored.
    pub fn done(&self) {
        let mut state = self.shared.lock_state();
        if state.phase.is_uploading() {
            tracing::debug!("Done ignored while an upload is in flight");
            return;
        }
        self.shared.clear_locked(&mut state, "done");
    }

    /// Watch receiver over session snapshots. The receiver always holds the
    /// latest snapshot; intermediate ones may be coalesced for slow readers.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.publisher.subscribe()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.lock_state().snapshot()
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        let mut state = self.shared.lock_state();
        if let Some(token) = state.cancel.take() {
            token.cancel();
        }
    }
}
