//! Win detection logic for tic-tac-toe.

use super::super::{Board, Mark, Position, Square};
use tracing::instrument;

/// The eight winning lines: three rows, three columns, two diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Returns true iff `mark` occupies every square of some line.
#[instrument(level = "trace")]
pub fn check_win(board: &Board, mark: Mark) -> bool {
    let target = Square::Occupied(mark);
    LINES
        .iter()
        .any(|line| line.iter().all(|&pos| board.get(pos) == target))
}

/// Returns the mark holding three in a row, if any.
///
/// The player is checked first, matching [`super::status`].
pub fn winner(board: &Board) -> Option<Mark> {
    [Mark::PLAYER, Mark::OPPONENT]
        .into_iter()
        .find(|&mark| check_win(board, mark))
}

/// Returns true if placing `mark` at the empty `pos` would win immediately.
pub fn completes_line(board: &Board, pos: Position, mark: Mark) -> bool {
    board.is_empty(pos) && check_win(&board.with_mark(pos, mark), mark)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(winner(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = Board::from_rows(["XXX", "O.O", "..."]);
        assert!(check_win(&board, Mark::X));
        assert_eq!(winner(&board), Some(Mark::X));
    }

    #[test]
    fn test_winner_diagonal() {
        let board = Board::from_rows(["O..", ".O.", "..O"]);
        assert!(check_win(&board, Mark::O));
        assert!(!check_win(&board, Mark::X));
    }

    #[test]
    fn test_winner_column() {
        let board = Board::from_rows([".X.", ".X.", ".X."]);
        assert!(check_win(&board, Mark::X));
    }

    #[test]
    fn test_completes_line() {
        let board = Board::from_rows(["XX.", "OO.", "..."]);
        assert!(completes_line(&board, Position::TopRight, Mark::X));
        assert!(!completes_line(&board, Position::TopRight, Mark::O));
        assert!(completes_line(&board, Position::MiddleRight, Mark::O));
        // Occupied squares never complete anything.
        assert!(!completes_line(&board, Position::TopLeft, Mark::X));
    }
}
