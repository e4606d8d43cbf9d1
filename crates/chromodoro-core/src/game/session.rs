//! Owning game session: round + board + persistence + events.
//!
//! The session is the mutate-then-persist pipeline of the game: every
//! state-changing method updates the in-memory record, writes it to the
//! store (best-effort) and publishes an event. The whole record - round,
//! active board, unlocked tips - is persisted under one key so a later
//! process taps the same board.

use std::sync::Arc;

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::events::{Event, EventBus};
use crate::game::board::{Board, ColorKey};
use crate::game::round::GameRound;
use crate::game::tips;
use crate::store::{self, keys, Store};

/// Everything the game persists, as one record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub round: GameRound,
    #[serde(default)]
    pub board: Option<Board>,
    #[serde(default)]
    pub unlocked_tips: Vec<u32>,
}

/// What a tap did, for shells to render.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TapResult {
    Matched {
        points: u32,
        combo: u32,
        score: u32,
        current_matches: u32,
        target_matches: u32,
    },
    LevelUp {
        points: u32,
        combo: u32,
        score: u32,
        level: u32,
        round_secs: f64,
        tip_unlocked: Option<u32>,
    },
    Missed {
        combo_before: u32,
    },
}

/// Random source used outside tests.
pub type GameRng = Mcg128Xsl64;

pub struct GameSession<R: Rng> {
    record: GameRecord,
    store: Arc<dyn Store>,
    bus: Arc<EventBus>,
    rng: R,
}

impl GameSession<GameRng> {
    /// Load the persisted game record (or defaults) with an entropy-seeded
    /// generator.
    pub fn load(store: Arc<dyn Store>, bus: Arc<EventBus>) -> Self {
        Self::load_with_rng(store, bus, GameRng::from_entropy())
    }
}

impl<R: Rng> GameSession<R> {
    /// Load the persisted game record with an injected random source.
    pub fn load_with_rng(store: Arc<dyn Store>, bus: Arc<EventBus>, rng: R) -> Self {
        let record = store::load_record(store.as_ref(), keys::GAME_STATE);
        Self {
            record,
            store,
            bus,
            rng,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn round(&self) -> &GameRound {
        &self.record.round
    }

    pub fn board(&self) -> Option<&Board> {
        self.record.board.as_ref()
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn unlocked_tips(&self) -> impl Iterator<Item = &'static tips::Tip> + '_ {
        self.record
            .unlocked_tips
            .iter()
            .filter_map(|id| tips::by_id(*id))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a round at the current level with a fresh board.
    pub fn start(&mut self) {
        self.record.round.start();
        self.unlock_tip_for(self.record.round.level);
        let board = Board::generate(&mut self.rng);
        let event = Event::GameStarted {
            level: self.record.round.level,
            round_secs: self.record.round.time_remaining_secs(),
            target: board.target,
            at: Utc::now(),
        };
        self.record.board = Some(board);
        self.persist();
        self.bus.publish(&event);
    }

    /// Handle a tap on a tile color. Returns `None` when no round is
    /// active or no board exists.
    pub fn tap(&mut self, color: ColorKey) -> Option<TapResult> {
        if !self.record.round.is_active() {
            return None;
        }
        let target = self.record.board.as_ref()?.target;

        let result = if color == target {
            let outcome = self.record.round.register_match();
            self.bus.publish(&Event::TileMatched {
                points: outcome.points,
                combo: outcome.combo,
                current_matches: self.record.round.current_matches,
                target_matches: self.record.round.target_matches,
                at: Utc::now(),
            });
            let tip_unlocked = if outcome.leveled_up {
                self.bus.publish(&Event::LevelCompleted {
                    level: self.record.round.level,
                    target_matches: self.record.round.target_matches,
                    round_secs: self.record.round.time_remaining_secs(),
                    at: Utc::now(),
                });
                self.unlock_tip_for(self.record.round.level)
            } else {
                None
            };
            // Correct taps always get a fresh board.
            self.record.board = Some(Board::generate(&mut self.rng));
            if outcome.leveled_up {
                TapResult::LevelUp {
                    points: outcome.points,
                    combo: outcome.combo,
                    score: self.record.round.score,
                    level: self.record.round.level,
                    round_secs: self.record.round.time_remaining_secs(),
                    tip_unlocked,
                }
            } else {
                TapResult::Matched {
                    points: outcome.points,
                    combo: outcome.combo,
                    score: self.record.round.score,
                    current_matches: self.record.round.current_matches,
                    target_matches: self.record.round.target_matches,
                }
            }
        } else {
            // A miss breaks the combo but keeps the board.
            let combo_before = self.record.round.register_miss();
            self.bus.publish(&Event::ComboBroken {
                combo_before,
                at: Utc::now(),
            });
            TapResult::Missed { combo_before }
        };

        self.persist();
        Some(result)
    }

    /// Tap by board position (0-based). `None` if the index is out of
    /// range or no round is active.
    pub fn tap_tile(&mut self, index: usize) -> Option<TapResult> {
        let color = self.record.board.as_ref()?.tile(index)?.color;
        self.tap(color)
    }

    /// Advance the round clock. Returns `true` when this tick times the
    /// round out.
    pub fn tick(&mut self, dt: f64) -> bool {
        if !self.record.round.is_active() {
            return false;
        }
        let timed_out = self.record.round.tick(dt);
        if timed_out {
            self.bus.publish(&Event::GameEnded {
                score: self.record.round.score,
                level: self.record.round.level,
                timed_out: true,
                at: Utc::now(),
            });
        }
        self.persist();
        timed_out
    }

    /// End the round early. Idempotent.
    pub fn end(&mut self) -> bool {
        if !self.record.round.end() {
            return false;
        }
        self.persist();
        self.bus.publish(&Event::GameEnded {
            score: self.record.round.score,
            level: self.record.round.level,
            timed_out: false,
            at: Utc::now(),
        });
        true
    }

    /// Return the round to defaults. High score, best combo, games played
    /// and unlocked tips survive.
    pub fn reset(&mut self) {
        self.record.round.reset();
        self.record.board = None;
        self.persist();
        self.bus.publish(&Event::GameReset { at: Utc::now() });
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn unlock_tip_for(&mut self, level: u32) -> Option<u32> {
        let tip = tips::for_level(level)?;
        if self.record.unlocked_tips.contains(&tip.id) {
            return None;
        }
        self.record.unlocked_tips.push(tip.id);
        self.bus.publish(&Event::TipUnlocked {
            tip_id: tip.id,
            at: Utc::now(),
        });
        Some(tip.id)
    }

    fn persist(&self) {
        store::save_record(self.store.as_ref(), keys::GAME_STATE, &self.record);
    }
}
