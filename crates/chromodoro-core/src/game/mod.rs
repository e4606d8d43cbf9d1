//! Color-matching game: round state machine, tile boards, tips and the
//! owning session.

pub mod board;
pub mod round;
pub mod session;
pub mod tips;

pub use board::{Board, ColorKey, Tile, BOARD_SIZE, TARGET_COUNT};
pub use round::{GameRound, MatchOutcome};
pub use session::{GameRecord, GameRng, GameSession, TapResult};
