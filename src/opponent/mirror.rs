//! Mirror opponent: answers the learner's last move with its point reflection.

use crate::games::tictactoe::{Board, Position};
use tracing::debug;

/// Reflection of `last_player_move` through the board centre, if that square is free.
///
/// `None` tells the caller to fall back to difficulty-weighted selection.
pub fn reflect(board: &Board, last_player_move: Option<Position>) -> Option<Position> {
    let reflected = last_player_move?.reflected();
    let available = board.is_empty(reflected);
    debug!(?last_player_move, %reflected, available, "Mirror candidate");
    available.then_some(reflected)
}
