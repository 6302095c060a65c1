//! Tests for the opponent strategies.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tictactoe_tutor::{
    Board, Difficulty, GameStatus, Mark, MoveContext, Position, Strategy, minimax, passive, rules,
    weighted_move,
};

/// Plays every learner line against minimax replies and returns the number
/// of finished games.
fn explore_learner_lines(board: Board) -> usize {
    let mut finished = 0;
    for pos in board.empty_positions() {
        let after_learner = board.with_mark(pos, Mark::PLAYER);
        match rules::status(&after_learner) {
            GameStatus::PlayerWin => panic!("learner beat minimax:\n{after_learner}"),
            GameStatus::Active => {}
            _ => {
                finished += 1;
                continue;
            }
        }

        let reply = minimax::best_move(&after_learner).expect("active board has a move");
        let after_reply = after_learner.with_mark(reply, Mark::OPPONENT);
        match rules::status(&after_reply) {
            GameStatus::Active => finished += explore_learner_lines(after_reply),
            GameStatus::PlayerWin => unreachable!("opponent move cannot win for the learner"),
            _ => finished += 1,
        }
    }
    finished
}

#[test]
fn test_minimax_never_loses_from_empty_board() {
    assert!(explore_learner_lines(Board::new()) > 0);
}

#[test]
fn test_minimax_never_loses_after_lesson_openings() {
    for opening in [Position::TopCenter, Position::Center, Position::TopLeft] {
        let board = Board::new().with_mark(opening, Mark::OPPONENT);
        explore_learner_lines(board);
    }
}

#[test]
fn test_minimax_prefers_faster_win() {
    // O can win now at TopRight or later elsewhere.
    let board = Board::from_rows(["OO.", "XX.", "X.."]);
    assert_eq!(minimax::best_move(&board), Some(Position::TopRight));
}

#[test]
fn test_hardest_difficulty_always_optimal() {
    let board = Board::from_rows(["OO.", "XX.", "X.."]);
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..1000 {
        assert_eq!(
            weighted_move(&board, Difficulty::HARDEST, &mut rng),
            Some(Position::TopRight)
        );
    }
}

#[test]
fn test_easiest_difficulty_is_random() {
    let board = Board::from_rows(["OO.", "XX.", "X.."]);
    let mut rng = StdRng::seed_from_u64(100);
    let optimal = (0..1000)
        .filter(|_| weighted_move(&board, Difficulty::EASIEST, &mut rng) == Some(Position::TopRight))
        .count();
    // Four empty squares: roughly a quarter of the picks land on the win.
    assert!((150..350).contains(&optimal), "optimal picks: {optimal}");
}

#[test]
fn test_passive_never_blocks_available_player_win() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut checked = 0;
    for _ in 0..2000 {
        let mut board = Board::new();
        let mut mark = Mark::PLAYER;
        for _ in 0..4 {
            let Some(&pos) = board.empty_positions().choose(&mut rng) else {
                break;
            };
            board = board.with_mark(pos, mark);
            mark = mark.opponent();
        }
        if rules::status(&board).is_terminal() {
            continue;
        }

        let winning: Vec<Position> = board
            .empty_positions()
            .into_iter()
            .filter(|&pos| rules::completes_line(&board, pos, Mark::PLAYER))
            .collect();
        if winning.is_empty() || winning.len() == board.empty_positions().len() {
            continue;
        }

        let choice = passive::choose(&board, &mut rng).expect("board has empty squares");
        assert!(!winning.contains(&choice), "blocked {choice} on\n{board}");
        checked += 1;
    }
    assert!(checked > 50, "too few boards with a learner win: {checked}");
}

#[test]
fn test_mirror_answers_with_reflection() {
    let board = Board::from_rows(["...", "..X", "..."]);
    let ctx = MoveContext::new(&board, Difficulty::EASIEST, Some(Position::MiddleRight));
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(
        Strategy::Mirror.choose(&ctx, &mut rng),
        Some(Position::MiddleLeft)
    );
}
