//! Passive "worst move" opponent for the early lessons.
//!
//! The opponent never blocks a square that would win for the learner and
//! never takes a square that would win for itself. Each filter falls back to
//! the less-filtered set when it would leave nothing to choose from.

use crate::games::tictactoe::{Board, Mark, Position, rules};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

/// Squares the passive opponent is willing to play, before the random pick.
pub fn candidates(board: &Board) -> Vec<Position> {
    let empty = board.empty_positions();

    let leaves_player_wins = keep_or_fallback(&empty, |pos| {
        !rules::completes_line(board, pos, Mark::PLAYER)
    });

    keep_or_fallback(&leaves_player_wins, |pos| {
        !rules::completes_line(board, pos, Mark::OPPONENT)
    })
}

/// Picks uniformly among [`candidates`].
#[instrument(level = "debug", skip_all)]
pub fn choose<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    let options = candidates(board);
    let choice = options.choose(rng).copied();
    debug!(?options, ?choice, "Passive opponent picked");
    choice
}

fn keep_or_fallback(positions: &[Position], keep: impl Fn(Position) -> bool) -> Vec<Position> {
    let kept: Vec<Position> = positions.iter().copied().filter(|&pos| keep(pos)).collect();
    if kept.is_empty() {
        positions.to_vec()
    } else {
        kept
    }
}
