//! End-to-end tests driving the built binary against a temporary data
//! directory.

use std::process::Command;

struct Cli {
    _dir: tempfile::TempDir,
    data_dir: std::path::PathBuf,
}

impl Cli {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let data_dir = dir.path().to_path_buf();
        Self {
            _dir: dir,
            data_dir,
        }
    }

    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_chromodoro"))
            .args(args)
            .env("CHROMODORO_DATA_DIR", &self.data_dir)
            .output()
            .expect("spawn chromodoro");
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.code().unwrap_or(-1),
        )
    }

    fn ok(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "{args:?} failed: {stderr}");
        stdout
    }

    fn game_record(&self) -> serde_json::Value {
        serde_json::from_str(&self.ok(&["game", "status"])).expect("game status json")
    }
}

#[test]
fn game_round_to_level_two() {
    let cli = Cli::new();
    cli.ok(&["game", "start"]);

    for _ in 0..10 {
        let target = cli.game_record()["board"]["target"]
            .as_str()
            .expect("active board")
            .to_string();
        cli.ok(&["game", "tap", &target]);
    }

    let record = cli.game_record();
    assert_eq!(record["round"]["score"], 190);
    assert_eq!(record["round"]["level"], 2);
    assert_eq!(record["round"]["target_matches"], 16);
    assert_eq!(record["round"]["combo"], 10);
}

#[test]
fn wrong_tap_breaks_combo_without_reshuffle() {
    let cli = Cli::new();
    cli.ok(&["game", "start"]);

    let record = cli.game_record();
    let target = record["board"]["target"].as_str().unwrap();
    let wrong = ["orange", "blue"]
        .into_iter()
        .find(|c| *c != target)
        .unwrap();
    let tiles_before = record["board"]["tiles"].clone();

    let stdout = cli.ok(&["game", "tap", wrong]);
    assert!(stdout.contains("missed"), "unexpected output: {stdout}");

    let record = cli.game_record();
    assert_eq!(record["round"]["combo"], 0);
    assert_eq!(record["round"]["score"], 0);
    assert_eq!(record["board"]["tiles"], tiles_before);
}

#[test]
fn game_reset_preserves_lifetime_records() {
    let cli = Cli::new();
    cli.ok(&["game", "start"]);
    let target = cli.game_record()["board"]["target"]
        .as_str()
        .unwrap()
        .to_string();
    cli.ok(&["game", "tap", &target]);
    cli.ok(&["game", "end"]);
    cli.ok(&["game", "reset"]);

    let record = cli.game_record();
    assert_eq!(record["round"]["score"], 0);
    assert_eq!(record["round"]["level"], 1);
    assert_eq!(record["round"]["high_score"], 10);
    assert_eq!(record["round"]["total_games_played"], 1);
    assert!(record["board"].is_null());

    let stats: serde_json::Value =
        serde_json::from_str(&cli.ok(&["stats"])).expect("stats json");
    assert_eq!(stats["total_games_played"], 1);
}

#[test]
fn focus_pause_resume_stop() {
    let cli = Cli::new();
    cli.ok(&["focus", "start", "--secs", "600"]);
    cli.ok(&["focus", "pause"]);

    let status = cli.ok(&["focus", "status"]);
    let view: serde_json::Value = serde_json::from_str(&status).expect("status json");
    assert_eq!(view["kind"], "work");
    assert_eq!(view["active"], false);
    let remaining = view["remaining_secs"].as_u64().unwrap();
    assert!(remaining > 590 && remaining <= 600);

    cli.ok(&["focus", "resume"]);
    let status = cli.ok(&["focus", "status"]);
    let view: serde_json::Value = serde_json::from_str(&status).expect("status json");
    assert_eq!(view["active"], true);

    let stdout = cli.ok(&["focus", "stop"]);
    assert!(stdout.contains("session stopped"));
    let status = cli.ok(&["focus", "status"]);
    assert!(status.contains("no focus session"));
}

#[test]
fn short_work_session_completes_and_counts() {
    let cli = Cli::new();
    cli.ok(&["focus", "start", "--secs", "1"]);
    std::thread::sleep(std::time::Duration::from_millis(1300));

    let status = cli.ok(&["focus", "status"]);
    let view: serde_json::Value = serde_json::from_str(&status).expect("status json");
    assert_eq!(view["completed"], true);
    assert_eq!(view["completed_sessions"], 1);

    let stats: serde_json::Value =
        serde_json::from_str(&cli.ok(&["stats"])).expect("stats json");
    assert_eq!(stats["total_pomodoros_completed"], 1);
    assert_eq!(stats["total_points"], 5);
}

#[test]
fn break_session_does_not_count() {
    let cli = Cli::new();
    cli.ok(&["focus", "break", "--secs", "1"]);
    std::thread::sleep(std::time::Duration::from_millis(1300));
    cli.ok(&["focus", "status"]);

    let stats: serde_json::Value =
        serde_json::from_str(&cli.ok(&["stats"])).expect("stats json");
    assert_eq!(stats["total_pomodoros_completed"], 0);
}

#[test]
fn task_lifecycle() {
    let cli = Cli::new();
    cli.ok(&[
        "task", "add", "Write report", "--category", "work", "--priority", "high",
    ]);
    cli.ok(&["task", "add", "Stretch", "--category", "health"]);

    let list = cli.ok(&["task", "list"]);
    assert!(list.contains("Write report"));
    assert!(list.contains("Stretch"));

    let tasks: serde_json::Value =
        serde_json::from_str(&cli.ok(&["task", "list", "--json"])).expect("task json");
    let id = tasks[0]["id"].as_str().unwrap().to_string();

    cli.ok(&["task", "done", &id]);
    let stats: serde_json::Value =
        serde_json::from_str(&cli.ok(&["stats"])).expect("stats json");
    assert_eq!(stats["total_tasks_completed"], 1);
    assert_eq!(stats["total_points"], 10);

    // Reopening reverses nothing.
    cli.ok(&["task", "done", &id]);
    let stats: serde_json::Value =
        serde_json::from_str(&cli.ok(&["stats"])).expect("stats json");
    assert_eq!(stats["total_tasks_completed"], 1);

    cli.ok(&["task", "remove", &id]);
    let list = cli.ok(&["task", "list"]);
    assert!(!list.contains("Write report"));
}

#[test]
fn empty_task_title_is_rejected() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["task", "add", "   "]);
    assert_ne!(code, 0);
    assert!(stderr.contains("title"), "stderr: {stderr}");
}

#[test]
fn prefs_set_and_show() {
    let cli = Cli::new();
    cli.ok(&["prefs", "set", "work_duration_secs", "900"]);
    let prefs: serde_json::Value =
        serde_json::from_str(&cli.ok(&["prefs", "show"])).expect("prefs json");
    assert_eq!(prefs["work_duration_secs"], 900);

    let (_, _, code) = cli.run(&["prefs", "set", "no_such_key", "1"]);
    assert_ne!(code, 0);
}

#[test]
fn streak_is_idempotent_within_a_day() {
    let cli = Cli::new();
    assert!(cli.ok(&["streak"]).contains("daily streak: 1"));
    assert!(cli.ok(&["streak"]).contains("daily streak: 1"));
}

#[test]
fn data_reset_requires_confirmation_and_wipes() {
    let cli = Cli::new();
    cli.ok(&["streak"]);
    cli.ok(&["task", "add", "keep me not"]);

    let (_, _, code) = cli.run(&["data", "reset"]);
    assert_ne!(code, 0);

    cli.ok(&["data", "reset", "--yes"]);
    let stats: serde_json::Value =
        serde_json::from_str(&cli.ok(&["stats"])).expect("stats json");
    assert_eq!(stats["daily_streak"], 0);
    assert!(cli.ok(&["task", "list"]).contains("no tasks"));
}

#[test]
fn linked_task_gets_pomodoro_credit() {
    let cli = Cli::new();
    cli.ok(&["task", "add", "Deep work"]);
    let tasks: serde_json::Value =
        serde_json::from_str(&cli.ok(&["task", "list", "--json"])).expect("task json");
    let id = tasks[0]["id"].as_str().unwrap().to_string();

    cli.ok(&["focus", "start", "--secs", "1", "--task", &id]);
    std::thread::sleep(std::time::Duration::from_millis(1300));
    cli.ok(&["focus", "status"]);

    let tasks: serde_json::Value =
        serde_json::from_str(&cli.ok(&["task", "list", "--json"])).expect("task json");
    assert_eq!(tasks[0]["pomodoro_count"], 1);
}
