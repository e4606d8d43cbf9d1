//! Pomodoro focus sessions.
//!
//! A [`FocusSession`] is one work or break timer instance; the
//! [`FocusEngine`] owns the current session and choreographs the reminder
//! notification around pause/resume/stop. Only one session is live at a
//! time - starting a new one replaces the old session and cancels its
//! reminder first.
//!
//! ## State Transitions
//!
//! ```text
//! Absent -> Active(work|break) -> (Paused -> Active) -> Completed -> Absent
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::countdown::{Countdown, Phase};
use crate::events::{Event, EventBus};
use crate::notify::{self, Notifier};
use crate::prefs::UserStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Work,
    Break,
}

impl SessionKind {
    pub fn reminder_id(self) -> &'static str {
        match self {
            SessionKind::Work => notify::WORK_COMPLETE_ID,
            SessionKind::Break => notify::BREAK_COMPLETE_ID,
        }
    }

    fn reminder_copy(self) -> (&'static str, &'static str) {
        match self {
            SessionKind::Work => ("Focus session complete", "Nice work. Time for a break."),
            SessionKind::Break => ("Break over", "Ready for the next focus session?"),
        }
    }
}

/// One work or break timer instance. Replaced, not mutated, on each
/// start; `completed_sessions` is carried across replacements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSession {
    pub kind: SessionKind,
    clock: Countdown,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub completed_sessions: u32,
}

impl FocusSession {
    fn new(kind: SessionKind, duration_secs: u32, task_id: Option<String>, carried: u32) -> Self {
        let mut clock = Countdown::new(duration_secs as f64);
        clock.start();
        Self {
            kind,
            clock,
            task_id,
            completed_sessions: carried,
        }
    }

    pub fn is_break(&self) -> bool {
        self.kind == SessionKind::Break
    }

    pub fn is_active(&self) -> bool {
        self.clock.is_running()
    }

    /// `true` once the session has run to completion and stopped ticking.
    pub fn is_completed(&self) -> bool {
        self.clock.phase() == Phase::Finished
    }

    pub fn duration_secs(&self) -> u32 {
        self.clock.duration_secs() as u32
    }

    pub fn remaining_secs(&self) -> u32 {
        self.clock.remaining_secs().ceil() as u32
    }

    /// 0.0 .. 1.0 fraction of the session already elapsed.
    pub fn progress(&self) -> f64 {
        self.clock.progress()
    }

    pub fn formatted_remaining(&self) -> String {
        self.clock.formatted_remaining()
    }
}

/// Owns the current focus session and its side effects.
///
/// Collaborators are injected; the engine itself never touches storage.
/// The shell persists [`FocusEngine::session`] wherever it keeps records.
pub struct FocusEngine {
    session: Option<FocusSession>,
    notifier: Arc<dyn Notifier>,
    bus: Arc<EventBus>,
}

impl FocusEngine {
    pub fn new(notifier: Arc<dyn Notifier>, bus: Arc<EventBus>) -> Self {
        Self {
            session: None,
            notifier,
            bus,
        }
    }

    /// Rebuild an engine around a previously persisted session.
    pub fn with_session(
        notifier: Arc<dyn Notifier>,
        bus: Arc<EventBus>,
        session: Option<FocusSession>,
    ) -> Self {
        Self {
            session,
            notifier,
            bus,
        }
    }

    pub fn session(&self) -> Option<&FocusSession> {
        self.session.as_ref()
    }

    /// Start a work session, replacing any current session.
    pub fn start_work(&mut self, duration_secs: u32, task_id: Option<String>) -> &FocusSession {
        self.start(SessionKind::Work, duration_secs, task_id)
    }

    /// Start a break, replacing any current session.
    pub fn start_break(&mut self, duration_secs: u32) -> &FocusSession {
        self.start(SessionKind::Break, duration_secs, None)
    }

    fn start(
        &mut self,
        kind: SessionKind,
        duration_secs: u32,
        task_id: Option<String>,
    ) -> &FocusSession {
        // The replaced session's reminder must be cancelled before the
        // new one reuses an identifier.
        let carried = match self.session.take() {
            Some(old) => {
                self.notifier.cancel(old.kind.reminder_id());
                old.completed_sessions
            }
            None => 0,
        };

        let session = FocusSession::new(kind, duration_secs, task_id, carried);
        let (title, body) = kind.reminder_copy();
        self.notifier
            .schedule(kind.reminder_id(), duration_secs as u64, title, body);
        self.bus.publish(&Event::FocusStarted {
            kind,
            duration_secs,
            at: Utc::now(),
        });
        self.session.insert(session)
    }

    /// Pause the session and cancel its reminder. `false` if nothing was
    /// running.
    pub fn pause(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.clock.pause() {
            return false;
        }
        self.notifier.cancel(session.kind.reminder_id());
        self.bus.publish(&Event::FocusPaused {
            remaining_secs: session.remaining_secs(),
            at: Utc::now(),
        });
        true
    }

    /// Resume a paused session, rescheduling the reminder for the
    /// remaining time only.
    pub fn resume(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.clock.resume() {
            return false;
        }
        let remaining = session.remaining_secs();
        let (title, body) = session.kind.reminder_copy();
        self.notifier
            .schedule(session.kind.reminder_id(), remaining as u64, title, body);
        self.bus.publish(&Event::FocusResumed {
            remaining_secs: remaining,
            at: Utc::now(),
        });
        true
    }

    /// Discard the session entirely. `false` if there was none.
    pub fn stop(&mut self) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        session.clock.stop();
        self.notifier.cancel(session.kind.reminder_id());
        self.bus.publish(&Event::FocusStopped {
            kind: session.kind,
            remaining_secs: session.remaining_secs(),
            at: Utc::now(),
        });
        true
    }

    /// Advance the session clock. Returns `true` on the tick that
    /// completes the session; only work completions count towards stats.
    /// The completed session stays visible until stopped or replaced.
    pub fn tick(&mut self, dt: f64, stats: &mut UserStats) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.clock.tick(dt) {
            return false;
        }
        self.on_complete(stats);
        true
    }

    /// Advance by wall-clock time passed since the last tick or flush.
    pub fn flush(&mut self, stats: &mut UserStats) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.clock.flush_elapsed() {
            return false;
        }
        self.on_complete(stats);
        true
    }

    fn on_complete(&mut self, stats: &mut UserStats) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.kind == SessionKind::Work {
            session.completed_sessions += 1;
            stats.record_pomodoro_completed();
        }
        self.bus.publish(&Event::FocusCompleted {
            kind: session.kind,
            completed_sessions: session.completed_sessions,
            at: Utc::now(),
        });
    }
}
