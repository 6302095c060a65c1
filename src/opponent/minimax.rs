//! Exhaustive minimax search for the opponent.
//!
//! Terminal boards score `10 - depth` when the opponent wins, `depth - 10`
//! when the player wins and `0` for a draw, where depth counts plies from the
//! root of the current search. Faster wins therefore score higher and slower
//! losses less negative. Nine empty squares at most, so no pruning.

use crate::games::tictactoe::{Board, Mark, Position, rules};
use tracing::{debug, instrument};

const WIN_SCORE: i32 = 10;

/// Returns the opponent move with the best minimax score.
///
/// Ties go to the first square in row-major order. `None` only when the board
/// has no empty square.
#[instrument(level = "debug", skip(board), fields(board = %board))]
pub fn best_move(board: &Board) -> Option<Position> {
    let mut best: Option<(i32, Position)> = None;

    for pos in board.empty_positions() {
        let score = minimax(&board.with_mark(pos, Mark::OPPONENT), 0, false);
        if best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, pos));
        }
    }

    debug!(choice = ?best, "Minimax search finished");
    best.map(|(_, pos)| pos)
}

/// Scores `board` with `maximizing` true when the opponent is to move.
pub fn minimax(board: &Board, depth: i32, maximizing: bool) -> i32 {
    if rules::check_win(board, Mark::OPPONENT) {
        return WIN_SCORE - depth;
    }
    if rules::check_win(board, Mark::PLAYER) {
        return depth - WIN_SCORE;
    }
    if rules::is_full(board) {
        return 0;
    }

    let mark = if maximizing { Mark::OPPONENT } else { Mark::PLAYER };
    let scores = board
        .empty_positions()
        .into_iter()
        .map(|pos| minimax(&board.with_mark(pos, mark), depth + 1, !maximizing));

    let best = if maximizing { scores.max() } else { scores.min() };
    // Non-terminal boards always have an empty square.
    best.unwrap_or(0)
}
