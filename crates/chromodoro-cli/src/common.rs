//! Shared plumbing for the CLI commands: the open store, the event bus,
//! the desktop notifier and the wall-clock catch-up stamps.
//!
//! The core only ever consumes serial `tick(dt)` calls; between CLI
//! invocations nothing is alive to deliver them, so the shell stamps a
//! last-seen timestamp per ticking loop and flushes the elapsed time as
//! one big tick on the next invocation.

use std::sync::Arc;

use chromodoro_core::store::{self, SqliteStore, Store};
use chromodoro_core::{CoreError, EventBus};
use serde::{Deserialize, Serialize};

use crate::notifier::DesktopNotifier;

/// Shell-private record keys, alongside the four core keys.
pub const FOCUS_SESSION_KEY: &str = "focus-session";
pub const GAME_CLOCK_KEY: &str = "game-last-seen";

pub const CLI_KEYS: [&str; 3] = [
    FOCUS_SESSION_KEY,
    GAME_CLOCK_KEY,
    crate::notifier::PENDING_KEY,
];

pub struct Ctx {
    pub store: Arc<SqliteStore>,
    pub bus: Arc<EventBus>,
    pub notifier: Arc<DesktopNotifier>,
}

impl Ctx {
    pub fn open() -> Result<Self, CoreError> {
        let store = Arc::new(SqliteStore::open()?);
        let bus = Arc::new(EventBus::new());
        let notifier = Arc::new(DesktopNotifier::new(store.clone()));
        Ok(Self {
            store,
            bus,
            notifier,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ClockStamp {
    #[serde(default)]
    epoch_ms: Option<u64>,
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Seconds of wall-clock time since the last call under `key`, stamping
/// now. The first call stamps and returns 0.
pub fn flush_clock_secs(store: &dyn Store, key: &str) -> f64 {
    let stamp: ClockStamp = store::load_record(store, key);
    let now = now_ms();
    store::save_record(store, key, &ClockStamp { epoch_ms: Some(now) });
    match stamp.epoch_ms {
        Some(last) => now.saturating_sub(last) as f64 / 1000.0,
        None => 0.0,
    }
}

/// Restart the stamp at now, discarding any accumulated elapsed time.
pub fn reset_clock(store: &dyn Store, key: &str) {
    store::save_record(
        store,
        key,
        &ClockStamp {
            epoch_ms: Some(now_ms()),
        },
    );
}
