//! Event taxonomy and listener registration.
//!
//! Every state change in the system produces an [`Event`]. Shells print
//! or react to them; embedders subscribe listeners on the [`EventBus`].

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::focus::SessionKind;
use crate::game::board::ColorKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    GameStarted {
        level: u32,
        round_secs: f64,
        target: ColorKey,
        at: DateTime<Utc>,
    },
    TileMatched {
        points: u32,
        combo: u32,
        current_matches: u32,
        target_matches: u32,
        at: DateTime<Utc>,
    },
    ComboBroken {
        combo_before: u32,
        at: DateTime<Utc>,
    },
    LevelCompleted {
        level: u32,
        target_matches: u32,
        round_secs: f64,
        at: DateTime<Utc>,
    },
    TipUnlocked {
        tip_id: u32,
        at: DateTime<Utc>,
    },
    GameEnded {
        score: u32,
        level: u32,
        timed_out: bool,
        at: DateTime<Utc>,
    },
    GameReset {
        at: DateTime<Utc>,
    },
    FocusStarted {
        kind: SessionKind,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    FocusPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    FocusResumed {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    FocusCompleted {
        kind: SessionKind,
        completed_sessions: u32,
        at: DateTime<Utc>,
    },
    FocusStopped {
        kind: SessionKind,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TaskAdded {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskUpdated {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskReopened {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        task_id: String,
        at: DateTime<Utc>,
    },
    StreakUpdated {
        days: u32,
        at: DateTime<Utc>,
    },
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
pub type ListenerId = u64;

type Listener = Box<dyn Fn(&Event) + Send>;

/// Explicit observer registration.
///
/// Listeners are invoked serially, in registration order, on the thread
/// that publishes. There is no queueing or replay: a listener only sees
/// events published while it is subscribed.
pub struct EventBus {
    inner: Mutex<BusInner>,
}

struct BusInner {
    next_id: ListenerId,
    listeners: Vec<(ListenerId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BusInner {
                next_id: 1,
                listeners: Vec::new(),
            }),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&Event) + Send + 'static) -> ListenerId {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if the id was already gone.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _)| *lid != id);
        inner.listeners.len() != before
    }

    pub fn publish(&self, event: &Event) {
        let inner = self.lock();
        for (_, listener) in &inner.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, BusInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
