//! Toast/notification sink
//!
//! Fire-and-forget notifications shared by every component: the upload
//! session's failure path and the generic request helpers both speak through
//! [`Notifier`]. Hosts plug in whatever surfaces the toast; the default sink
//! logs through `tracing`.

use std::sync::Mutex;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A recorded notification (kind plus message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Fire-and-forget notification sink. Implementations must not block and
/// must not fail; a notification is advisory only.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Default sink: maps notice kinds onto tracing levels.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => tracing::info!(notice = "success", "{message}"),
            NoticeKind::Error => tracing::error!(notice = "error", "{message}"),
            NoticeKind::Warning => tracing::warn!(notice = "warning", "{message}"),
            NoticeKind::Info => tracing::info!(notice = "info", "{message}"),
        }
    }
}

/// Recording sink for tests and embedding UIs that render their own toasts.
#[derive(Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices recorded so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        // Notifications are advisory; a poisoned lock still holds valid data.
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notice {
                kind,
                message: message.to_string(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.notify(NoticeKind::Info, "first");
        notifier.notify(NoticeKind::Error, "second");

        let notices = notifier.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].kind, NoticeKind::Info);
        assert_eq!(notices[0].message, "first");
        assert_eq!(notices[1].kind, NoticeKind::Error);
        assert_eq!(notices[1].message, "second");
    }

    #[test]
    fn tracing_notifier_accepts_all_kinds() {
        // Smoke test: must not panic regardless of kind.
        let notifier = TracingNotifier;
        for kind in [
            NoticeKind::Success,
            NoticeKind::Error,
            NoticeKind::Warning,
            NoticeKind::Info,
        ] {
            notifier.notify(kind, "message");
        }
    }
}
