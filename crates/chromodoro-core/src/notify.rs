//! Reminder notification interface.
//!
//! Notifications are fire-and-forget side effects: scheduling and
//! cancellation never fail a state transition. Adapters swallow their own
//! errors and log them. The core ships a no-op adapter and a recording
//! test double; delivery adapters live in the shells.

use std::sync::Mutex;

/// Identifier reserved for the work-session-complete reminder.
pub const WORK_COMPLETE_ID: &str = "focus-work-complete";
/// Identifier reserved for the break-complete reminder.
pub const BREAK_COMPLETE_ID: &str = "focus-break-complete";

/// Reminder identifier for a specific task.
pub fn task_reminder_id(task_id: &str) -> String {
    format!("task-{task_id}")
}

/// Fire a reminder after a delay, cancelable by identifier.
///
/// Scheduling under an identifier that already has a pending reminder
/// replaces it. All operations are best-effort.
pub trait Notifier: Send + Sync {
    fn schedule(&self, id: &str, delay_secs: u64, title: &str, body: &str);
    fn cancel(&self, id: &str);
    fn cancel_all(&self);
}

/// Adapter that delivers nothing. Logs at debug so choreography stays
/// visible in traces.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn schedule(&self, id: &str, delay_secs: u64, title: &str, _body: &str) {
        tracing::debug!(id, delay_secs, title, "notification scheduled (null)");
    }

    fn cancel(&self, id: &str) {
        tracing::debug!(id, "notification cancelled (null)");
    }

    fn cancel_all(&self) {
        tracing::debug!("all notifications cancelled (null)");
    }
}

/// One observed notifier call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyCall {
    Scheduled {
        id: String,
        delay_secs: u64,
        title: String,
        body: String,
    },
    Cancelled {
        id: String,
    },
    CancelledAll,
}

/// Test double that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<NotifyCall>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<NotifyCall> {
        self.lock().clone()
    }

    /// Delay of the most recent still-pending schedule under `id`, if the
    /// last action touching `id` was a schedule.
    pub fn pending_delay(&self, id: &str) -> Option<u64> {
        self.lock().iter().rev().find_map(|call| match call {
            NotifyCall::Scheduled {
                id: cid,
                delay_secs,
                ..
            } if cid == id => Some(Some(*delay_secs)),
            NotifyCall::Cancelled { id: cid } if cid == id => Some(None),
            NotifyCall::CancelledAll => Some(None),
            _ => None,
        })?
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<NotifyCall>> {
        match self.calls.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn schedule(&self, id: &str, delay_secs: u64, title: &str, body: &str) {
        self.lock().push(NotifyCall::Scheduled {
            id: id.to_string(),
            delay_secs,
            title: title.to_string(),
            body: body.to_string(),
        });
    }

    fn cancel(&self, id: &str) {
        self.lock().push(NotifyCall::Cancelled { id: id.to_string() });
    }

    fn cancel_all(&self) {
        self.lock().push(NotifyCall::CancelledAll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_call_order() {
        let notifier = RecordingNotifier::new();
        notifier.schedule("a", 10, "t", "b");
        notifier.cancel("a");
        notifier.cancel_all();
        assert_eq!(
            notifier.calls(),
            vec![
                NotifyCall::Scheduled {
                    id: "a".into(),
                    delay_secs: 10,
                    title: "t".into(),
                    body: "b".into(),
                },
                NotifyCall::Cancelled { id: "a".into() },
                NotifyCall::CancelledAll,
            ]
        );
    }

    #[test]
    fn pending_delay_tracks_last_action() {
        let notifier = RecordingNotifier::new();
        assert_eq!(notifier.pending_delay("x"), None);
        notifier.schedule("x", 30, "t", "b");
        assert_eq!(notifier.pending_delay("x"), Some(30));
        notifier.schedule("x", 12, "t", "b");
        assert_eq!(notifier.pending_delay("x"), Some(12));
        notifier.cancel("x");
        assert_eq!(notifier.pending_delay("x"), None);
    }

    #[test]
    fn task_reminder_ids_are_distinct_per_task() {
        assert_ne!(task_reminder_id("a"), task_reminder_id("b"));
        assert_ne!(task_reminder_id("a"), WORK_COMPLETE_ID);
    }
}
