//! # Chromodoro Core Library
//!
//! Core business logic for Chromodoro, a color-matching game grafted onto
//! a personal productivity toolkit (tasks, Pomodoro timer, streaks,
//! points). It follows a CLI-first philosophy: every operation is
//! available from the standalone CLI binary, and any GUI is a thin layer
//! over this same library.
//!
//! ## Architecture
//!
//! - **Countdown**: a caller-driven timer primitive; nothing here owns a
//!   thread, the shell delivers `tick(dt)` calls serially
//! - **Game / Focus**: the two session state machines, each wrapping the
//!   countdown and persisting after every transition
//! - **Storage**: an opaque byte key-value store (SQLite in production)
//!   holding four independent serde_json records
//! - **Notifications**: a fire-and-forget reminder interface, cancelable
//!   by identifier; adapters live in the shells
//!
//! ## Key Components
//!
//! - [`GameSession`]: owning game loop (round + tile board + tips)
//! - [`FocusEngine`]: owning Pomodoro loop with reminder choreography
//! - [`TaskList`]: ordered task collection with completion bookkeeping
//! - [`Preferences`] / [`UserStats`]: durable value records
//! - [`EventBus`]: explicit observer registration for every transition

pub mod countdown;
pub mod error;
pub mod events;
pub mod focus;
pub mod game;
pub mod notify;
pub mod prefs;
pub mod store;
pub mod streak;
pub mod task;

pub use countdown::{Countdown, Phase};
pub use error::{CoreError, Result, StoreError, ValidationError};
pub use events::{Event, EventBus, ListenerId};
pub use focus::{FocusEngine, FocusSession, SessionKind};
pub use game::{Board, ColorKey, GameRecord, GameRound, GameSession, TapResult, Tile};
pub use notify::{Notifier, NullNotifier, RecordingNotifier};
pub use prefs::{Preferences, UserStats};
pub use store::{MemoryStore, SqliteStore, Store};
pub use task::{Category, Priority, Task, TaskList, TaskPatch};
