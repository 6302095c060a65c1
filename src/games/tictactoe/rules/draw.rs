//! Draw detection logic for tic-tac-toe.

use super::super::{Board, Square};

/// Checks if the board is full (all squares occupied).
///
/// A full board with no winner indicates a draw.
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

#[cfg(test)]
mod tests {
    use super::super::win::winner;
    use super::*;

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let board = Board::from_rows(["...", ".X.", "..."]);
        assert!(!is_full(&board));
    }

    #[test]
    fn test_draw_detection() {
        let board = Board::from_rows(["XOX", "OXX", "OXO"]);
        assert!(is_full(&board));
        assert_eq!(winner(&board), None);
    }
}
