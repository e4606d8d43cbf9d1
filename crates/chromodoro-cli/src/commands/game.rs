use std::sync::Arc;

use chromodoro_core::game::{GameRng, TapResult};
use chromodoro_core::store::{self, keys, Store};
use chromodoro_core::{ColorKey, GameSession, UserStats};
use clap::Subcommand;

use crate::common::{self, Ctx, GAME_CLOCK_KEY};

#[derive(Subcommand)]
pub enum GameAction {
    /// Start a round at the current level
    Start,
    /// Show the current board
    Board,
    /// Tap a tile by number (1-12) or by color name
    Tap {
        /// Tile number or color name
        tile: String,
    },
    /// Print the game record as JSON (flushes elapsed time first)
    Status,
    /// End the round early
    End,
    /// Reset round state, keeping high score, best combo and games played
    Reset,
}

/// Flush wall-clock time into the round. Returns `true` if the round
/// timed out while no process was watching.
fn flush(ctx: &Ctx, session: &mut GameSession<GameRng>) -> bool {
    if !session.round().is_active() {
        return false;
    }
    let dt = common::flush_clock_secs(ctx.store.as_ref() as &dyn Store, GAME_CLOCK_KEY);
    if session.tick(dt) {
        record_game_played(ctx);
        return true;
    }
    false
}

fn record_game_played(ctx: &Ctx) {
    let store = ctx.store.as_ref() as &dyn Store;
    let mut stats: UserStats = store::load_record(store, keys::USER_STATS);
    stats.record_game_played();
    store::save_record(store, keys::USER_STATS, &stats);
}

fn print_board(session: &GameSession<GameRng>) {
    let Some(board) = session.board() else {
        println!("no board -- run `chromodoro game start`");
        return;
    };
    println!("target: {}", board.target);
    for (row, chunk) in board.tiles.chunks(4).enumerate() {
        let cells: Vec<String> = chunk
            .iter()
            .enumerate()
            .map(|(col, tile)| format!("{:2}. {:7}", row * 4 + col + 1, tile.color))
            .collect();
        println!("{}", cells.join("  "));
    }
}

pub fn run(action: GameAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Ctx::open()?;
    let mut session = GameSession::load(ctx.store.clone(), ctx.bus.clone());

    match action {
        GameAction::Start => {
            session.start();
            common::reset_clock(ctx.store.as_ref() as &dyn Store, GAME_CLOCK_KEY);
            let round = session.round();
            println!(
                "level {} -- match {} {} tiles in {:.0}s",
                round.level,
                round.target_matches,
                session.board().map(|b| b.target.as_str()).unwrap_or("?"),
                round.time_remaining_secs(),
            );
            print_board(&session);
        }
        GameAction::Board => {
            if flush(&ctx, &mut session) {
                println!("time's up -- final score {}", session.round().score);
                return Ok(());
            }
            print_board(&session);
        }
        GameAction::Tap { tile } => {
            if flush(&ctx, &mut session) {
                println!("time's up -- final score {}", session.round().score);
                return Ok(());
            }
            let result = if let Ok(number) = tile.parse::<usize>() {
                if number == 0 {
                    return Err("tile numbers start at 1".into());
                }
                session.tap_tile(number - 1)
            } else {
                let color: ColorKey = tile.parse()?;
                session.tap(color)
            };
            match result {
                Some(result) => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                    if !matches!(result, TapResult::Missed { .. }) {
                        print_board(&session);
                    }
                }
                None => println!("no active round -- run `chromodoro game start`"),
            }
        }
        GameAction::Status => {
            flush(&ctx, &mut session);
            println!("{}", serde_json::to_string_pretty(session.record())?);
        }
        GameAction::End => {
            if session.end() {
                record_game_played(&ctx);
                let round = session.round();
                println!(
                    "round over -- score {} (high score {})",
                    round.score, round.high_score
                );
            } else {
                println!("no active round");
            }
        }
        GameAction::Reset => {
            session.reset();
            println!("game reset");
        }
    }

    Ok(())
}
