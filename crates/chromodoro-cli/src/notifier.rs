//! Desktop reminder adapter.
//!
//! There is no daemon: scheduling writes a pending reminder into the kv
//! store, and the `focus watch` and `status` commands deliver whatever
//! has come due through the desktop notification service. Delivery
//! failures are logged and dropped, never surfaced.

use std::sync::Arc;

use chromodoro_core::store::{self, Store};
use chromodoro_core::Notifier;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const PENDING_KEY: &str = "pending-reminders";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PendingReminder {
    id: String,
    due_at: DateTime<Utc>,
    title: String,
    body: String,
}

pub struct DesktopNotifier {
    store: Arc<dyn Store>,
}

impl DesktopNotifier {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    fn load(&self) -> Vec<PendingReminder> {
        store::load_record(self.store.as_ref(), PENDING_KEY)
    }

    fn save(&self, pending: &[PendingReminder]) {
        store::save_record(self.store.as_ref(), PENDING_KEY, &pending);
    }

    /// Deliver every reminder that has come due. Returns how many were
    /// delivered (or attempted; failures still count as consumed).
    pub fn deliver_due(&self) -> usize {
        let now = Utc::now();
        let (due, rest): (Vec<_>, Vec<_>) =
            self.load().into_iter().partition(|r| r.due_at <= now);
        if due.is_empty() {
            return 0;
        }
        for reminder in &due {
            if let Err(e) = notify_rust::Notification::new()
                .summary(&reminder.title)
                .body(&reminder.body)
                .show()
            {
                tracing::warn!(id = %reminder.id, error = %e, "desktop notification failed");
            }
        }
        self.save(&rest);
        due.len()
    }
}

impl Notifier for DesktopNotifier {
    fn schedule(&self, id: &str, delay_secs: u64, title: &str, body: &str) {
        let mut pending = self.load();
        pending.retain(|r| r.id != id);
        pending.push(PendingReminder {
            id: id.to_string(),
            due_at: Utc::now() + Duration::seconds(delay_secs as i64),
            title: title.to_string(),
            body: body.to_string(),
        });
        self.save(&pending);
    }

    fn cancel(&self, id: &str) {
        let mut pending = self.load();
        let before = pending.len();
        pending.retain(|r| r.id != id);
        if pending.len() != before {
            self.save(&pending);
        }
    }

    fn cancel_all(&self) {
        self.save(&[]);
    }
}
