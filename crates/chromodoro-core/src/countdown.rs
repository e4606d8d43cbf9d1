//! Countdown timer primitive.
//!
//! Both the game round and the focus session count down on top of this
//! type. It has no internal threads - the caller drives it by calling
//! `tick(dt)` with elapsed seconds, or `flush_elapsed()` to catch up from
//! the wall clock between invocations of a shell process.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running) -> Finished
//! ```
//!
//! Completion is signalled exactly once: the tick that brings the
//! remaining time to zero returns `true` and moves the phase to
//! `Finished`; later ticks are no-ops until a restart.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Caller-driven countdown over real seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    duration_secs: f64,
    remaining_secs: f64,
    phase: Phase,
    /// Timestamp (ms since epoch) of the last wall-clock flush.
    /// Used by `flush_elapsed` to compute time passed between processes.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl Countdown {
    /// Create a countdown in the `Idle` phase with the full duration remaining.
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs: duration_secs.max(0.0),
            remaining_secs: duration_secs.max(0.0),
            phase: Phase::Idle,
            last_tick_epoch_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> f64 {
        self.remaining_secs
    }

    /// 0.0 .. 1.0 fraction of the duration already elapsed.
    pub fn progress(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs / self.duration_secs)
    }

    /// Remaining time rendered as `MM:SS` (whole seconds, truncated).
    pub fn formatted_remaining(&self) -> String {
        let total = self.remaining_secs as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh run over the configured duration.
    ///
    /// Returns `false` without touching state if already running.
    pub fn start(&mut self) -> bool {
        if self.phase == Phase::Running {
            return false;
        }
        self.remaining_secs = self.duration_secs;
        self.phase = Phase::Running;
        self.last_tick_epoch_ms = Some(now_ms());
        true
    }

    /// Replace the duration and begin a fresh run immediately.
    pub fn restart(&mut self, duration_secs: f64) {
        self.duration_secs = duration_secs.max(0.0);
        self.remaining_secs = self.duration_secs;
        self.phase = Phase::Running;
        self.last_tick_epoch_ms = Some(now_ms());
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::Paused;
        self.last_tick_epoch_ms = None;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Running;
        self.last_tick_epoch_ms = Some(now_ms());
        true
    }

    /// Cancel any further ticks. Remaining time is left as-is.
    /// Idempotent: stopping an already-stopped countdown is a no-op.
    pub fn stop(&mut self) {
        self.phase = Phase::Idle;
        self.last_tick_epoch_ms = None;
    }

    /// Advance the countdown by `dt` seconds.
    ///
    /// Returns `true` exactly once, on the tick that exhausts the
    /// remaining time. Ignored unless running; `dt <= 0` is a no-op.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.phase != Phase::Running || dt <= 0.0 {
            return false;
        }
        self.last_tick_epoch_ms = Some(now_ms());
        self.remaining_secs = (self.remaining_secs - dt).max(0.0);
        if self.remaining_secs == 0.0 {
            self.phase = Phase::Finished;
            self.last_tick_epoch_ms = None;
            return true;
        }
        false
    }

    /// Advance by however much wall-clock time passed since the last
    /// flush or tick. Lets a short-lived shell process catch up a
    /// countdown that kept "running" while no process was alive.
    pub fn flush_elapsed(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let now = now_ms();
        let Some(last) = self.last_tick_epoch_ms else {
            self.last_tick_epoch_ms = Some(now);
            return false;
        };
        let elapsed_ms = now.saturating_sub(last);
        if elapsed_ms == 0 {
            return false;
        }
        self.tick(elapsed_ms as f64 / 1000.0)
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
