//! Tests for the four-board variant.

use std::rc::Rc;
use tictactoe_tutor::{
    GameStatus, LessonId, Mark, Position, Program, RuntimeFault, SandboxFault, ScriptedPresenter,
    Square, Tutor, TutorConfig, Variant,
};

fn quad_tutor(lesson: u8) -> (Tutor, Rc<ScriptedPresenter>) {
    let presenter = Rc::new(ScriptedPresenter::new());
    let config = TutorConfig::default()
        .with_variant(Variant::Quad)
        .with_seed(23)
        .with_start_lesson(LessonId::new(lesson).unwrap());
    let tutor = Tutor::new(config, presenter.clone());
    tutor.start();
    (tutor, presenter)
}

fn center_then_end_turn() -> Program {
    Program::from_json(
        r#"{"blocks": [
            {"op": "place_mark_at", "row": {"number": 2}, "col": {"number": 2}},
            {"op": "end_turn"}
        ]}"#,
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_openings_are_rotated_per_board() {
    let (tutor, _) = quad_tutor(1);
    let expected = [
        Position::TopCenter,
        Position::MiddleRight,
        Position::BottomCenter,
        Position::MiddleLeft,
    ];
    for (board, pos) in tutor.boards().iter().zip(expected) {
        assert_eq!(board.get(pos), Square::Occupied(Mark::O));
        assert_eq!(board.empty_positions().len(), 8);
    }
}

#[tokio::test(start_paused = true)]
async fn test_one_shared_reply_per_board() {
    let (tutor, presenter) = quad_tutor(1);
    let report = tutor.run(&center_then_end_turn()).await.unwrap();
    assert!(report.faults.is_empty());

    for board in tutor.boards() {
        assert_eq!(board.get(Position::Center), Square::Occupied(Mark::X));
        assert_eq!(board.empty_positions().len(), 6);
    }
    // Four setups, four learner moves, four replies.
    assert_eq!(presenter.refreshes().len(), 12);
    let praised = presenter
        .statuses()
        .iter()
        .filter(|s| s.contains("You took the center!"))
        .count();
    assert_eq!(praised, 4);
}

#[tokio::test(start_paused = true)]
async fn test_final_lesson_mirrors_each_board() {
    let (tutor, _) = quad_tutor(5);
    let program = Program::from_json(
        r#"{"blocks": [
            {"op": "place_mark_at", "row": {"number": 1}, "col": {"number": 1}},
            {"op": "end_turn"}
        ]}"#,
    )
    .unwrap();
    tutor.run(&program).await.unwrap();

    for board in tutor.boards() {
        assert_eq!(board.get(Position::TopLeft), Square::Occupied(Mark::X));
        assert_eq!(board.get(Position::BottomRight), Square::Occupied(Mark::O));
    }
}

#[tokio::test(start_paused = true)]
async fn test_looping_program_finishes_every_board() {
    let (tutor, _) = quad_tutor(1);
    let program = Program::from_json(
        r#"{"blocks": [
            {"op": "forever", "body": [
                {"op": "for", "var": "r", "from": {"number": 1}, "to": {"number": 3}, "body": [
                    {"op": "for", "var": "c", "from": {"number": 1}, "to": {"number": 3}, "body": [
                        {"op": "if",
                         "cond": {"logic": {"op": "and",
                                            "lhs": {"not": "has_player_moved"},
                                            "rhs": {"is_square_empty": {"row": {"var": "r"}, "col": {"var": "c"}}}}},
                         "then": [{"op": "place_mark_at", "row": {"var": "r"}, "col": {"var": "c"}}]}
                    ]}
                ]},
                {"op": "end_turn"}
            ]}
        ]}"#,
    )
    .unwrap();

    let report = tutor.run(&program).await.unwrap();
    assert!(report.faults.is_empty(), "{:?}", report.faults);
    assert!(tutor.statuses().iter().all(|s| s.is_terminal()));

    let verdict = report.verdict.expect("every board finished");
    let wins = tutor
        .statuses()
        .iter()
        .filter(|&&s| s == GameStatus::PlayerWin)
        .count();
    assert_eq!(verdict.passed, wins == 4);
}

#[tokio::test(start_paused = true)]
async fn test_ignored_placement_gets_no_reply() {
    let (tutor, presenter) = quad_tutor(1);
    tutor.run(&center_then_end_turn()).await.unwrap();
    let before = presenter.refreshes().len();

    // Nothing to place: occupied centers are ignored, nobody moved, nobody replies.
    tutor.run(&center_then_end_turn()).await.unwrap();
    assert_eq!(presenter.refreshes().len(), before);
}

#[tokio::test(start_paused = true)]
async fn test_fault_releases_boards_waiting_at_end_of_turn() {
    let (tutor, presenter) = quad_tutor(1);
    // Only the fourth board has its opening mark at (2,1). The other boards end
    // their turn and wait; the fourth divides by zero instead.
    let program = Program::from_json(
        r#"{"blocks": [
            {"op": "place_mark_at", "row": {"number": 2}, "col": {"number": 2}},
            {"op": "if",
             "cond": {"is_square_empty": {"row": {"number": 2}, "col": {"number": 1}}},
             "then": [{"op": "end_turn"}],
             "otherwise": [
                {"op": "set", "var": "x",
                 "value": {"arith": {"op": "div", "lhs": {"number": 1}, "rhs": {"number": 0}}}}
             ]}
        ]}"#,
    )
    .unwrap();

    let report = tutor.run(&program).await.unwrap();
    assert_eq!(report.faults.len(), 1);
    assert_eq!(report.faults[0].board, 3);
    assert_eq!(
        report.faults[0].fault,
        SandboxFault::Runtime(RuntimeFault::DivisionByZero)
    );
    assert!(!tutor.is_running());
    assert!(
        presenter
            .statuses()
            .iter()
            .any(|s| s.starts_with("Board 4: Runtime fault"))
    );

    // Every board kept its learner move and got its reply.
    for board in tutor.boards() {
        assert_eq!(board.get(Position::Center), Square::Occupied(Mark::X));
        assert_eq!(board.empty_positions().len(), 6);
    }
    assert!(tutor.statuses().iter().all(|&s| s == GameStatus::Active));
}
