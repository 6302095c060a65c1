//! Tests for the tutor façade on a single board.

use std::rc::Rc;
use tictactoe_tutor::{
    Expr, GameStatus, LessonId, Mark, Position, Program, RunError, ScriptedPresenter, Square,
    Stmt, Tutor, TutorConfig,
};

fn place(row: i64, col: i64) -> Stmt {
    Stmt::PlaceMarkAt {
        row: Expr::Number(row),
        col: Expr::Number(col),
    }
}

fn tutor() -> (Tutor, Rc<ScriptedPresenter>) {
    let presenter = Rc::new(ScriptedPresenter::new());
    let tutor = Tutor::new(TutorConfig::default().with_seed(17), presenter.clone());
    tutor.start();
    (tutor, presenter)
}

#[tokio::test(start_paused = true)]
async fn test_first_lesson_center_move() {
    let (tutor, presenter) = tutor();
    assert_eq!(
        tutor.boards()[0].get(Position::TopCenter),
        Square::Occupied(Mark::O)
    );
    assert!(presenter.statuses().iter().any(|s| s == tutor.teaching_text()));

    let report = tutor
        .run(&Program::new(vec![place(2, 2)]).unwrap())
        .await
        .unwrap();
    assert!(report.faults.is_empty());
    assert_eq!(report.verdict, None);
    assert_eq!(
        tutor.boards()[0].get(Position::Center),
        Square::Occupied(Mark::X)
    );
    assert!(
        presenter
            .statuses()
            .iter()
            .any(|s| s.contains("You took the center!"))
    );
    // The opponent answered once.
    assert_eq!(tutor.boards()[0].empty_positions().len(), 6);
    assert_eq!(tutor.statuses(), vec![GameStatus::Active]);
}

#[tokio::test(start_paused = true)]
async fn test_off_center_move_gets_advice() {
    let (tutor, presenter) = tutor();
    tutor
        .run(&Program::new(vec![place(1, 1)]).unwrap())
        .await
        .unwrap();
    assert!(
        presenter
            .statuses()
            .iter()
            .any(|s| s.contains("Next time try the center"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_second_run_while_running_is_refused() {
    let (tutor, _) = tutor();
    let program = Program::new(vec![place(2, 2)]).unwrap();

    let (first, second) = tokio::join!(tutor.run(&program), tutor.run(&program));
    assert!(first.is_ok());
    assert_eq!(second, Err(RunError::AlreadyRunning));
    assert!(!tutor.is_running());

    // Once the first run is done, the next one is accepted.
    assert!(tutor.run(&program).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_runaway_loop_reports_fault_and_keeps_board() {
    let (tutor, presenter) = tutor();
    let program = Program::new(vec![
        place(2, 2),
        Stmt::While {
            cond: Expr::Bool(true),
            body: vec![],
            until: false,
        },
    ])
    .unwrap();

    let report = tutor.run(&program).await.unwrap();
    assert_eq!(report.faults.len(), 1);
    assert_eq!(report.iterations, 1000);
    assert!(
        presenter
            .last_status()
            .is_some_and(|s| s.starts_with("Infinite loop"))
    );
    assert_eq!(
        tutor.boards()[0].get(Position::Center),
        Square::Occupied(Mark::X)
    );
    assert!(!tutor.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_hints_follow_the_lesson() {
    let (tutor, _) = tutor();
    assert_eq!(tutor.hints(), LessonId::FIRST.lesson().hints);
    assert_eq!(tutor.secrets(), None);
    assert!(tutor.unlock_secrets("blockly"));
    assert_eq!(tutor.secrets(), Some(LessonId::FIRST.lesson().solution));
}
