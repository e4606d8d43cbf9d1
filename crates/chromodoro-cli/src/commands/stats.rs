use chromodoro_core::store::{self, keys};
use chromodoro_core::{GameRecord, Preferences, UserStats};
use serde::Serialize;

use crate::common::Ctx;

#[derive(Serialize)]
struct StatsView {
    total_tasks_completed: u32,
    total_pomodoros_completed: u32,
    total_games_played: u32,
    total_points: u32,
    daily_streak: u32,
    high_score: u32,
    best_combo: u32,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Ctx::open()?;
    let store = ctx.store.as_ref();
    let stats: UserStats = store::load_record(store, keys::USER_STATS);
    let prefs: Preferences = store::load_record(store, keys::PREFERENCES);
    let game: GameRecord = store::load_record(store, keys::GAME_STATE);

    let view = StatsView {
        total_tasks_completed: stats.total_tasks_completed,
        total_pomodoros_completed: stats.total_pomodoros_completed,
        total_games_played: stats.total_games_played,
        total_points: stats.total_points,
        daily_streak: prefs.daily_streak,
        high_score: game.round.high_score,
        best_combo: game.round.best_combo,
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
