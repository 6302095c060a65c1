//! Tic-tac-toe tutor library - lesson-driven games for block programs
//!
//! Learners assemble block programs that move the X piece; the library runs
//! them against a computer opponent and scores the result against a
//! five-lesson curriculum.
//!
//! # Architecture
//!
//! - **Games**: board model, win/draw rules and debug-build invariants
//! - **Opponent**: random, minimax, difficulty-weighted, passive and mirror strategies
//! - **Sandbox**: typed block programs, interpreter and shared loop budget
//! - **Coordinator**: turn sequencing on one board, or four boards behind a barrier
//! - **Lessons**: curriculum, end-of-game verdicts and forward-only progress
//! - **Tutor**: the façade front ends drive
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use tictactoe_tutor::{Program, ScriptedPresenter, Tutor, TutorConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let tutor = Tutor::new(TutorConfig::default(), Rc::new(ScriptedPresenter::new()));
//! tutor.start();
//!
//! let program = Program::from_json(
//!     r#"{"blocks": [{"op": "place_mark_at", "row": {"number": 2}, "col": {"number": 2}}]}"#,
//! )?;
//! let report = tutor.run(&program).await?;
//! assert!(report.faults.is_empty());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod coordinator;
mod games;
mod lessons;
mod opponent;
mod presenter;
mod sandbox;
mod tutor;

// Crate-level exports - Configuration
pub use config::{ConfigError, TutorConfig, Variant};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, Game, GameStatus, Mark, Move, Placement, Position, Rejection, Square, invariants, rules,
};

// Crate-level exports - Opponent
pub use opponent::{Difficulty, MoveContext, Strategy, minimax, mirror, passive, random_move, weighted_move};

// Crate-level exports - Lessons
pub use lessons::{
    EndCriterion, LESSONS, Lesson, LessonId, LessonProgress, MoveFeedback, Phase, ProgressError,
    Verdict, Winner,
};

// Crate-level exports - Sandbox
pub use sandbox::{
    ArithOp, CompareOp, EngineApi, Expr, Interpreter, LogicOp, LoopBudget, Program, ProgramError,
    RuntimeFault, SandboxFault, Stmt, Value,
};

// Crate-level exports - Coordination
pub use coordinator::{
    Arrival, BoardFault, BoardHandle, BoardSlot, Coordinator, OpponentMove, PlayerMove, Session,
    TurnBarrier, TurnMode,
};

// Crate-level exports - Presentation
pub use presenter::{ConsolePresenter, Presenter, ScriptedPresenter};

// Crate-level exports - Tutor
pub use tutor::{RunError, RunReport, Tutor};
