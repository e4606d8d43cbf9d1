//! Focus session scenarios: tick-to-completion, pause round-trips and
//! the reminder choreography around them.

use std::sync::Arc;

use chromodoro_core::notify::{NotifyCall, WORK_COMPLETE_ID};
use chromodoro_core::{
    EventBus, FocusEngine, FocusSession, RecordingNotifier, SessionKind, UserStats,
};

fn engine() -> (FocusEngine, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = FocusEngine::new(notifier.clone(), Arc::new(EventBus::new()));
    (engine, notifier)
}

#[test]
fn work_session_ticked_to_zero_completes_once() {
    let (mut engine, _) = engine();
    let mut stats = UserStats::default();

    engine.start_work(25, None);
    let mut completions = 0;
    for _ in 0..25 {
        if engine.tick(1.0, &mut stats) {
            completions += 1;
        }
    }
    assert_eq!(completions, 1);
    assert_eq!(engine.session().unwrap().completed_sessions, 1);
    assert_eq!(stats.total_pomodoros_completed, 1);

    // The finished session stays visible but no longer ticks.
    assert!(!engine.tick(1.0, &mut stats));
    assert_eq!(stats.total_pomodoros_completed, 1);
}

#[test]
fn break_completion_awards_nothing() {
    let (mut engine, _) = engine();
    let mut stats = UserStats::default();

    engine.start_break(5);
    for _ in 0..5 {
        engine.tick(1.0, &mut stats);
    }
    assert_eq!(engine.session().unwrap().completed_sessions, 0);
    assert_eq!(stats.total_pomodoros_completed, 0);
    assert_eq!(stats.total_points, 0);
}

#[test]
fn pause_resume_round_trip_loses_no_time() {
    let (mut engine, notifier) = engine();
    let mut stats = UserStats::default();

    engine.start_work(600, None);
    engine.tick(123.0, &mut stats);
    let remaining = engine.session().unwrap().remaining_secs();
    assert_eq!(remaining, 477);

    engine.pause();
    engine.resume();
    assert_eq!(engine.session().unwrap().remaining_secs(), remaining);
    // The reminder is rescheduled for the remaining time, not the full
    // duration.
    assert_eq!(
        notifier.pending_delay(WORK_COMPLETE_ID),
        Some(remaining as u64)
    );
}

#[test]
fn stop_discards_the_session_and_cancels_the_reminder() {
    let (mut engine, notifier) = engine();
    engine.start_work(60, None);
    assert!(engine.stop());
    assert!(engine.session().is_none());
    assert_eq!(notifier.pending_delay(WORK_COMPLETE_ID), None);
    assert!(!engine.stop());
}

#[test]
fn identifiers_are_distinct_per_session_kind() {
    let (mut engine, notifier) = engine();
    engine.start_work(60, None);
    engine.stop();
    engine.start_break(30);

    let scheduled: Vec<String> = notifier
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            NotifyCall::Scheduled { id, .. } => Some(id),
            _ => None,
        })
        .collect();
    assert_eq!(scheduled, vec!["focus-work-complete", "focus-break-complete"]);
}

#[test]
fn persisted_session_resumes_in_a_new_engine() {
    let bus = Arc::new(EventBus::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let mut stats = UserStats::default();

    let mut engine = FocusEngine::new(notifier.clone(), bus.clone());
    engine.start_work(300, Some("abc".into()));
    engine.tick(100.0, &mut stats);
    engine.pause();
    let json = serde_json::to_vec(&engine.session()).unwrap();
    drop(engine);

    let restored: Option<FocusSession> = serde_json::from_slice(&json).unwrap();
    let mut engine = FocusEngine::with_session(notifier, bus, restored);
    let session = engine.session().unwrap();
    assert_eq!(session.kind, SessionKind::Work);
    assert_eq!(session.remaining_secs(), 200);
    assert_eq!(session.task_id.as_deref(), Some("abc"));

    assert!(engine.resume());
    for _ in 0..200 {
        engine.tick(1.0, &mut stats);
    }
    assert_eq!(engine.session().unwrap().completed_sessions, 1);
    assert_eq!(stats.total_pomodoros_completed, 1);
}

#[test]
fn progress_and_formatting_track_the_clock() {
    let (mut engine, _) = engine();
    let mut stats = UserStats::default();
    engine.start_work(1500, None);
    assert_eq!(engine.session().unwrap().formatted_remaining(), "25:00");
    assert_eq!(engine.session().unwrap().progress(), 0.0);

    engine.tick(750.0, &mut stats);
    let session = engine.session().unwrap();
    assert_eq!(session.formatted_remaining(), "12:30");
    assert!((session.progress() - 0.5).abs() < 1e-9);
}
