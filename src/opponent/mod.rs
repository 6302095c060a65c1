//! Computer opponent strategies.
//!
//! Every strategy returns an empty square or `None` when the board is full.
//! Callers check the game status first, so `None` means no move is applied.

mod difficulty;
pub mod minimax;
pub mod mirror;
pub mod passive;

pub use difficulty::Difficulty;

use crate::games::tictactoe::{Board, Position};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// How the opponent picks its squares.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    /// Uniform choice among empty squares.
    Random,
    /// Always the minimax move.
    Minimax,
    /// Minimax with probability `(difficulty - 1) * 0.25`, random otherwise.
    Weighted,
    /// Never blocks the learner and never wins on purpose.
    Passive,
    /// Point reflection of the learner's last move, weighted otherwise.
    Mirror,
}

/// Everything a strategy may look at when choosing.
#[derive(Debug, Clone, Copy, derive_new::new)]
pub struct MoveContext<'a> {
    /// The board the opponent is about to play on.
    pub board: &'a Board,
    /// Current difficulty.
    pub difficulty: Difficulty,
    /// Learner's most recent placement on this board.
    pub last_player_move: Option<Position>,
}

impl Strategy {
    /// Chooses the opponent's next square.
    #[instrument(level = "debug", skip(ctx, rng), fields(difficulty = %ctx.difficulty))]
    pub fn choose<R: Rng + ?Sized>(self, ctx: &MoveContext<'_>, rng: &mut R) -> Option<Position> {
        let choice = match self {
            Strategy::Random => random_move(ctx.board, rng),
            Strategy::Minimax => minimax::best_move(ctx.board),
            Strategy::Weighted => weighted_move(ctx.board, ctx.difficulty, rng),
            Strategy::Passive => passive::choose(ctx.board, rng),
            Strategy::Mirror => mirror::reflect(ctx.board, ctx.last_player_move)
                .or_else(|| weighted_move(ctx.board, ctx.difficulty, rng)),
        };
        debug!(?choice, "Opponent chose");
        choice
    }
}

/// Uniform choice among the empty squares.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    board.empty_positions().choose(rng).copied()
}

/// Difficulty-weighted selection between minimax and random.
///
/// The draw happens first; a draw below the optimal probability uses
/// minimax, falling through to random when minimax finds nothing.
pub fn weighted_move<R: Rng + ?Sized>(
    board: &Board,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Position> {
    let draw: f64 = rng.random();
    let optimal = draw < difficulty.optimal_probability();
    debug!(draw, optimal, "Weighted draw");

    optimal
        .then(|| minimax::best_move(board))
        .flatten()
        .or_else(|| random_move(board, rng))
}
