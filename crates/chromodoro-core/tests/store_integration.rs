//! On-disk store behavior: real SQLite file, record codec fallbacks and
//! the data wipe.

use chromodoro_core::store::{self, keys, SqliteStore, Store};
use chromodoro_core::{GameRecord, Preferences, TaskList, UserStats};

fn open_temp() -> (tempfile::TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::open_at(&dir.path().join("chromodoro.db")).expect("open store");
    (dir, store)
}

#[test]
fn records_survive_a_reopen() {
    let (dir, store) = open_temp();

    let mut prefs = Preferences::default();
    prefs.work_duration_secs = 900;
    store::save_record(&store, keys::PREFERENCES, &prefs);
    drop(store);

    let store = SqliteStore::open_at(&dir.path().join("chromodoro.db")).expect("reopen");
    let loaded: Preferences = store::load_record(&store, keys::PREFERENCES);
    assert_eq!(loaded.work_duration_secs, 900);
}

#[test]
fn all_four_records_default_when_absent() {
    let (_dir, store) = open_temp();

    let prefs: Preferences = store::load_record(&store, keys::PREFERENCES);
    assert_eq!(prefs.work_duration_secs, 1500);

    let game: GameRecord = store::load_record(&store, keys::GAME_STATE);
    assert_eq!(game.round.level, 1);
    assert!(game.board.is_none());

    let tasks: TaskList = store::load_record(&store, keys::TASKS);
    assert!(tasks.is_empty());

    let stats: UserStats = store::load_record(&store, keys::USER_STATS);
    assert_eq!(stats.total_points, 0);
}

#[test]
fn all_four_records_default_when_corrupt() {
    let (_dir, store) = open_temp();
    for key in keys::ALL {
        store.save(key, b"\xff\xfenot json at all").expect("save");
    }

    let prefs: Preferences = store::load_record(&store, keys::PREFERENCES);
    assert_eq!(prefs.daily_streak, 0);
    let game: GameRecord = store::load_record(&store, keys::GAME_STATE);
    assert_eq!(game.round.score, 0);
    let tasks: TaskList = store::load_record(&store, keys::TASKS);
    assert!(tasks.is_empty());
    let stats: UserStats = store::load_record(&store, keys::USER_STATS);
    assert_eq!(stats.total_games_played, 0);
}

#[test]
fn schema_mismatch_is_treated_as_absence() {
    let (_dir, store) = open_temp();
    // Valid JSON, wrong shape for the record.
    store
        .save(keys::GAME_STATE, br#"{"round": "not an object"}"#)
        .expect("save");
    let game: GameRecord = store::load_record(&store, keys::GAME_STATE);
    assert_eq!(game.round.level, 1);
}

#[test]
fn wipe_returns_everything_to_defaults() {
    let (_dir, store) = open_temp();

    let mut prefs = Preferences::default();
    prefs.daily_streak = 9;
    store::save_record(&store, keys::PREFERENCES, &prefs);
    let mut stats = UserStats::default();
    stats.total_points = 400;
    store::save_record(&store, keys::USER_STATS, &stats);

    store::wipe_all(&store).expect("wipe");

    let prefs: Preferences = store::load_record(&store, keys::PREFERENCES);
    assert_eq!(prefs.daily_streak, 0);
    let stats: UserStats = store::load_record(&store, keys::USER_STATS);
    assert_eq!(stats.total_points, 0);
}

#[test]
fn keys_are_independent() {
    let (_dir, store) = open_temp();
    store::save_record(&store, keys::USER_STATS, &UserStats {
        total_points: 10,
        ..UserStats::default()
    });
    store.delete(keys::PREFERENCES).expect("delete");

    let stats: UserStats = store::load_record(&store, keys::USER_STATS);
    assert_eq!(stats.total_points, 10);
}
