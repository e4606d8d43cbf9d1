//! Game round state machine.
//!
//! Tracks score, level, combo and match progress for one play-through.
//! The round does not know about tiles or colors - the owning session
//! decides whether a tap matched and calls `register_match` or
//! `register_miss`.
//!
//! ## State Transitions
//!
//! ```text
//! Inactive -> Active -> (level up -> Active) | Ended -> Inactive
//! ```

use serde::{Deserialize, Serialize};

use crate::countdown::Countdown;

pub const BASE_TARGET_MATCHES: u32 = 10;
pub const MATCHES_PER_LEVEL: u32 = 3;
pub const BASE_ROUND_SECS: f64 = 30.0;
pub const MIN_ROUND_SECS: f64 = 20.0;
pub const BASE_TAP_POINTS: u32 = 10;
pub const POINTS_PER_COMBO: u32 = 2;

/// Round seconds granted by `start()` at the given level.
pub fn round_secs_at_start(level: u32) -> f64 {
    (BASE_ROUND_SECS - (level.saturating_sub(1)) as f64).max(MIN_ROUND_SECS)
}

/// Round seconds granted by a level-up to the given level. One second
/// shorter than a fresh start at the same level; the asymmetry is part of
/// the game's tuning.
pub fn round_secs_after_level_up(level: u32) -> f64 {
    (BASE_ROUND_SECS - level as f64).max(MIN_ROUND_SECS)
}

/// Result of registering a correct tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Points awarded by this tap.
    pub points: u32,
    /// Combo value after this tap.
    pub combo: u32,
    /// `true` when the tap completed the level.
    pub leveled_up: bool,
}

/// One play-through of the color-matching game.
///
/// Created once per install and kept across rounds; lifetime counters
/// (high score, best combo, games played) survive `reset()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRound {
    #[serde(default)]
    pub score: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default = "default_target_matches")]
    pub target_matches: u32,
    #[serde(default)]
    pub current_matches: u32,
    #[serde(default = "default_clock")]
    clock: Countdown,
    #[serde(default)]
    pub combo: u32,
    #[serde(default)]
    pub best_combo: u32,
    #[serde(default)]
    pub high_score: u32,
    #[serde(default)]
    pub total_games_played: u32,
}

fn default_level() -> u32 {
    1
}
fn default_target_matches() -> u32 {
    BASE_TARGET_MATCHES
}
fn default_clock() -> Countdown {
    Countdown::new(BASE_ROUND_SECS)
}

impl Default for GameRound {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            target_matches: BASE_TARGET_MATCHES,
            current_matches: 0,
            clock: default_clock(),
            combo: 0,
            best_combo: 0,
            high_score: 0,
            total_games_played: 0,
        }
    }
}

impl GameRound {
    /// An active round is one whose clock is running.
    pub fn is_active(&self) -> bool {
        self.clock.is_running()
    }

    pub fn time_remaining_secs(&self) -> f64 {
        self.clock.remaining_secs()
    }

    /// 0.0 .. 1.0 progress towards the current level's match target.
    pub fn match_progress(&self) -> f64 {
        if self.target_matches == 0 {
            return 0.0;
        }
        self.current_matches as f64 / self.target_matches as f64
    }

    /// Begin a round at the current level.
    pub fn start(&mut self) {
        self.score = 0;
        self.current_matches = 0;
        self.combo = 0;
        self.clock.restart(round_secs_at_start(self.level));
    }

    /// Record a correct tap. Points come from the combo value before it
    /// increments: the first tap of a streak is worth 10, the next 12.
    ///
    /// Must only be called while active.
    pub fn register_match(&mut self) -> MatchOutcome {
        debug_assert!(self.is_active());

        let points = BASE_TAP_POINTS + POINTS_PER_COMBO * self.combo;
        self.combo += 1;
        self.best_combo = self.best_combo.max(self.combo);
        self.score += points;
        self.high_score = self.high_score.max(self.score);
        self.current_matches += 1;

        let leveled_up = self.current_matches >= self.target_matches;
        if leveled_up {
            self.level += 1;
            self.target_matches = BASE_TARGET_MATCHES + MATCHES_PER_LEVEL * self.level;
            self.clock.restart(round_secs_after_level_up(self.level));
            self.current_matches = 0;
        }

        MatchOutcome {
            points,
            combo: self.combo,
            leveled_up,
        }
    }

    /// Record an incorrect tap: the combo breaks, nothing else changes.
    /// Returns the combo value that was lost.
    pub fn register_miss(&mut self) -> u32 {
        let before = self.combo;
        self.combo = 0;
        before
    }

    /// Advance the round clock. Returns `true` on the tick that runs the
    /// round out of time, which also commits the game-played counter.
    pub fn tick(&mut self, dt: f64) -> bool {
        if !self.clock.tick(dt) {
            return false;
        }
        self.total_games_played += 1;
        true
    }

    /// End the round early. Idempotent: a no-op on an inactive round, so
    /// the games-played counter commits once per round.
    pub fn end(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.clock.stop();
        self.total_games_played += 1;
        true
    }

    /// Return to defaults, preserving lifetime counters.
    pub fn reset(&mut self) {
        self.score = 0;
        self.level = 1;
        self.target_matches = BASE_TARGET_MATCHES;
        self.current_matches = 0;
        self.clock = default_clock();
        self.combo = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn level_one_starts_with_ten_matches_and_thirty_seconds() {
        let mut round = GameRound::default();
        round.start();
        assert!(round.is_active());
        assert_eq!(round.target_matches, 10);
        assert_eq!(round.time_remaining_secs(), 30.0);
    }

    #[test]
    fn clean_level_is_worth_190_points() {
        let mut round = GameRound::default();
        round.start();
        for _ in 0..9 {
            assert!(!round.register_match().leveled_up);
        }
        let last = round.register_match();
        assert!(last.leveled_up);
        assert_eq!(round.combo, 10);
        assert_eq!(round.score, 190);
        assert_eq!(round.level, 2);
        assert_eq!(round.target_matches, 16);
        assert_eq!(round.time_remaining_secs(), 28.0);
        assert_eq!(round.current_matches, 0);
    }

    #[test]
    fn miss_breaks_the_combo_only() {
        let mut round = GameRound::default();
        round.start();
        round.register_match();
        round.register_match();
        let score = round.score;
        assert_eq!(round.register_miss(), 2);
        assert_eq!(round.combo, 0);
        assert_eq!(round.score, score);
        assert_eq!(round.best_combo, 2);
        // The streak restarts at base points.
        assert_eq!(round.register_match().points, 10);
    }

    #[test]
    fn round_secs_floor_at_twenty() {
        assert_eq!(round_secs_at_start(1), 30.0);
        assert_eq!(round_secs_at_start(11), 20.0);
        assert_eq!(round_secs_at_start(50), 20.0);
        assert_eq!(round_secs_after_level_up(2), 28.0);
        assert_eq!(round_secs_after_level_up(10), 20.0);
        assert_eq!(round_secs_after_level_up(40), 20.0);
    }

    #[test]
    fn timeout_ends_the_round_once() {
        let mut round = GameRound::default();
        round.start();
        assert!(!round.tick(29.0));
        assert!(round.tick(5.0));
        assert!(!round.is_active());
        assert_eq!(round.time_remaining_secs(), 0.0);
        assert_eq!(round.total_games_played, 1);
        assert!(!round.tick(1.0));
        assert_eq!(round.total_games_played, 1);
    }

    #[test]
    fn end_is_idempotent() {
        let mut round = GameRound::default();
        round.start();
        assert!(round.end());
        assert!(!round.end());
        assert_eq!(round.total_games_played, 1);
    }

    #[test]
    fn reset_preserves_lifetime_counters() {
        let mut round = GameRound::default();
        round.start();
        for _ in 0..12 {
            round.register_match();
        }
        round.end();
        let (high, best, played) = (round.high_score, round.best_combo, round.total_games_played);
        assert!(high > 0);

        round.reset();
        assert_eq!(round.score, 0);
        assert_eq!(round.level, 1);
        assert_eq!(round.target_matches, 10);
        assert_eq!(round.current_matches, 0);
        assert_eq!(round.combo, 0);
        assert!(!round.is_active());
        assert_eq!(round.high_score, high);
        assert_eq!(round.best_combo, best);
        assert_eq!(round.total_games_played, played);
    }

    proptest! {
        #[test]
        fn tap_points_follow_the_combo(misses_before in 0usize..3, streak in 1u32..9) {
            let mut round = GameRound::default();
            round.start();
            for _ in 0..misses_before {
                round.register_miss();
            }
            for expected_combo_before in 0..streak {
                let outcome = round.register_match();
                prop_assert_eq!(outcome.points, 10 + 2 * expected_combo_before);
                prop_assert_eq!(outcome.combo, expected_combo_before + 1);
            }
        }

        #[test]
        fn level_up_formulas_hold(level in 1u32..60) {
            let mut round = GameRound { level, ..GameRound::default() };
            round.start();
            round.target_matches = 1;
            let outcome = round.register_match();
            prop_assert!(outcome.leveled_up);
            prop_assert_eq!(round.level, level + 1);
            prop_assert_eq!(round.target_matches, 10 + 3 * (level + 1));
            prop_assert_eq!(round.time_remaining_secs(), (30.0 - (level + 1) as f64).max(20.0));
        }
    }
}
