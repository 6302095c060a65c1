//! Execution sandbox for learner programs.
//!
//! Programs are typed block trees run by a small interpreter against an
//! [`EngineApi`] bound to one board. Termination is guaranteed by a
//! [`LoopBudget`] shared across every board of a run.

mod api;
mod budget;
mod error;
mod interpreter;
mod program;

pub use api::EngineApi;
pub use budget::LoopBudget;
pub use error::{ProgramError, RuntimeFault, SandboxFault};
pub use interpreter::{Interpreter, Value};
pub use program::{ArithOp, CompareOp, Expr, LogicOp, Program, Stmt};
