use std::io::Write;

use chromodoro_core::store::{self, keys};
use chromodoro_core::{FocusEngine, FocusSession, Preferences, TaskList, UserStats};
use clap::Subcommand;
use serde::Serialize;

use crate::common::{Ctx, FOCUS_SESSION_KEY};

#[derive(Subcommand)]
pub enum FocusAction {
    /// Start a work session
    Start {
        /// Duration in seconds (defaults to the work duration preference)
        #[arg(long)]
        secs: Option<u32>,
        /// Task id (or unambiguous prefix) to credit the pomodoro to
        #[arg(long)]
        task: Option<String>,
    },
    /// Start a break
    Break {
        /// Duration in seconds (defaults to the break duration preference)
        #[arg(long)]
        secs: Option<u32>,
    },
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Discard the session
    Stop,
    /// Print session state as JSON (flushes elapsed time first)
    Status,
    /// Tick every second until the session completes
    Watch,
}

#[derive(Serialize)]
struct SessionView<'a> {
    kind: &'a str,
    remaining: String,
    remaining_secs: u32,
    duration_secs: u32,
    progress: f64,
    active: bool,
    completed: bool,
    completed_sessions: u32,
    task_id: Option<&'a str>,
}

impl<'a> SessionView<'a> {
    fn of(session: &'a FocusSession) -> Self {
        Self {
            kind: if session.is_break() { "break" } else { "work" },
            remaining: session.formatted_remaining(),
            remaining_secs: session.remaining_secs(),
            duration_secs: session.duration_secs(),
            progress: session.progress(),
            active: session.is_active(),
            completed: session.is_completed(),
            completed_sessions: session.completed_sessions,
            task_id: session.task_id.as_deref(),
        }
    }
}

/// Credit the linked task once a work session completes.
fn settle_completion(engine: &FocusEngine, tasks: &mut TaskList) {
    let Some(session) = engine.session() else {
        return;
    };
    if session.is_break() {
        return;
    }
    if let Some(task_id) = &session.task_id {
        if let Some(count) = tasks.record_pomodoro(task_id) {
            println!("pomodoro credited ({count} total on task)");
        }
    }
}

pub fn run(action: FocusAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Ctx::open()?;
    let store = ctx.store.as_ref();
    let prefs: Preferences = store::load_record(store, keys::PREFERENCES);
    let mut stats: UserStats = store::load_record(store, keys::USER_STATS);
    let mut tasks: TaskList = store::load_record(store, keys::TASKS);
    let saved: Option<FocusSession> = store::load_record(store, FOCUS_SESSION_KEY);
    let mut engine = FocusEngine::with_session(ctx.notifier.clone(), ctx.bus.clone(), saved);

    // Catch up on wall-clock time that passed with no process alive.
    if engine.flush(&mut stats) {
        settle_completion(&engine, &mut tasks);
    }

    match action {
        FocusAction::Start { secs, task } => {
            let task_id = match task {
                Some(prefix) => Some(
                    tasks
                        .find_by_prefix(&prefix)
                        .ok_or_else(|| format!("no unique task matching '{prefix}'"))?
                        .id
                        .clone(),
                ),
                None => None,
            };
            let duration = secs.unwrap_or(prefs.work_duration_secs);
            let session = engine.start_work(duration, task_id);
            println!("focus started -- {}", session.formatted_remaining());
        }
        FocusAction::Break { secs } => {
            let duration = secs.unwrap_or(prefs.break_duration_secs);
            let session = engine.start_break(duration);
            println!("break started -- {}", session.formatted_remaining());
        }
        FocusAction::Pause => {
            match (engine.pause(), engine.session()) {
                (true, Some(session)) => println!("paused at {}", session.formatted_remaining()),
                _ => println!("nothing to pause"),
            }
        }
        FocusAction::Resume => {
            match (engine.resume(), engine.session()) {
                (true, Some(session)) => println!("resumed -- {}", session.formatted_remaining()),
                _ => println!("nothing to resume"),
            }
        }
        FocusAction::Stop => {
            if engine.stop() {
                println!("session stopped");
            } else {
                println!("no session");
            }
        }
        FocusAction::Status => {
            ctx.notifier.deliver_due();
            match engine.session() {
                Some(session) => {
                    println!("{}", serde_json::to_string_pretty(&SessionView::of(session))?)
                }
                None => println!("no focus session"),
            }
        }
        FocusAction::Watch => {
            if engine.session().map_or(true, |s| !s.is_active()) {
                println!("no running focus session");
            } else {
                loop {
                    std::thread::sleep(std::time::Duration::from_secs(1));
                    let completed = engine.flush(&mut stats);
                    ctx.notifier.deliver_due();
                    let Some(session) = engine.session() else {
                        break;
                    };
                    print!(
                        "\r{} {}   ",
                        if session.is_break() { "break" } else { "focus" },
                        session.formatted_remaining()
                    );
                    std::io::stdout().flush()?;
                    if completed {
                        println!();
                        println!("session complete");
                        settle_completion(&engine, &mut tasks);
                        break;
                    }
                }
            }
        }
    }

    store::save_record(store, FOCUS_SESSION_KEY, &engine.session());
    store::save_record(store, keys::USER_STATS, &stats);
    store::save_record(store, keys::TASKS, &tasks);
    Ok(())
}

