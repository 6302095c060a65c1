//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating board state
//! according to tic-tac-toe rules. Rules are separated from board
//! storage so the opponent search can evaluate hypothetical boards.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_win, completes_line, winner};

use super::{Board, GameStatus, Mark};
use tracing::instrument;

/// Derives the status of a board.
///
/// Lines are checked before fullness so a final winning move is never
/// reported as a draw.
#[instrument(level = "trace")]
pub fn status(board: &Board) -> GameStatus {
    if check_win(board, Mark::PLAYER) {
        GameStatus::PlayerWin
    } else if check_win(board, Mark::OPPONENT) {
        GameStatus::OpponentWin
    } else if is_full(board) {
        GameStatus::Draw
    } else {
        GameStatus::Active
    }
}
