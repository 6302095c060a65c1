//! Typed block programs produced by the visual editor.
//!
//! Programs are plain data: a list of statements whose expressions reference
//! engine queries by name. They deserialize from JSON or TOML and are
//! validated once at load time.
//!
//! ```
//! use tictactoe_tutor::Program;
//!
//! let program = Program::from_json(
//!     r#"{"blocks": [{"op": "place_mark_at", "row": {"number": 2}, "col": {"number": 2}}]}"#,
//! )
//! .unwrap();
//! assert_eq!(program.blocks().len(), 1);
//! ```

use super::error::ProgramError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// A learner program: the statements of one run/continue action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    blocks: Vec<Stmt>,
}

/// One statement block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Stmt {
    /// Place the learner's mark at a one-indexed square.
    PlaceMarkAt {
        /// Row, 1 to 3.
        row: Expr,
        /// Column, 1 to 3.
        col: Expr,
    },
    /// Place the learner's mark on a random empty square.
    PlaceMarkRandomly,
    /// Change the opponent difficulty (clamped to 1..=5).
    SetDifficulty {
        /// New level.
        level: Expr,
    },
    /// Yield the turn to the opponent.
    EndTurn,
    /// Assign a variable.
    Set {
        /// Variable name.
        var: String,
        /// New value.
        value: Expr,
    },
    /// Conditional.
    If {
        /// Condition.
        cond: Expr,
        /// Runs when the condition holds.
        then: Vec<Stmt>,
        /// Runs otherwise.
        #[serde(default)]
        otherwise: Vec<Stmt>,
    },
    /// Fixed-count loop; the count is evaluated once.
    Repeat {
        /// Iterations.
        times: Expr,
        /// Loop body.
        body: Vec<Stmt>,
    },
    /// Conditional loop. With `until`, loops while the condition is false.
    While {
        /// Condition checked before each iteration.
        cond: Expr,
        /// Loop body.
        body: Vec<Stmt>,
        /// Inverts the condition.
        #[serde(default)]
        until: bool,
    },
    /// Counting loop over an inclusive range.
    For {
        /// Counter variable.
        var: String,
        /// First value.
        from: Expr,
        /// Last value.
        to: Expr,
        /// Step magnitude, default 1; direction follows `from` and `to`.
        #[serde(default)]
        by: Option<Expr>,
        /// Loop body.
        body: Vec<Stmt>,
    },
    /// Unconditional loop, ended only by `break` or the loop budget.
    Forever {
        /// Loop body.
        body: Vec<Stmt>,
    },
    /// Leave the innermost loop.
    Break,
    /// Skip to the next iteration of the innermost loop.
    Continue,
}

/// Expression block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Integer literal.
    Number(i64),
    /// Boolean literal.
    Bool(bool),
    /// Variable read.
    Var(String),
    /// Whether a one-indexed square is empty (false off the board).
    IsSquareEmpty {
        /// Row.
        row: Box<Expr>,
        /// Column.
        col: Box<Expr>,
    },
    /// Whether the learner already moved this turn.
    HasPlayerMoved,
    /// Boolean negation.
    Not(Box<Expr>),
    /// Short-circuit boolean operator.
    Logic {
        /// Operator.
        op: LogicOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Comparison.
    Compare {
        /// Operator.
        op: CompareOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Checked integer arithmetic.
    Arith {
        /// Operator.
        op: ArithOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Uniform integer in an inclusive range (bounds may come in either order).
    RandomInt {
        /// One bound.
        from: Box<Expr>,
        /// Other bound.
        to: Box<Expr>,
    },
}

/// Boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicOp {
    /// Both.
    And,
    /// Either.
    Or,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Neq,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithOp {
    /// Sum.
    Add,
    /// Difference.
    Sub,
    /// Product.
    Mul,
    /// Truncating quotient.
    Div,
    /// Remainder.
    Mod,
}

impl Program {
    /// Builds a program from statements, validating it.
    pub fn new(blocks: Vec<Stmt>) -> Result<Self, ProgramError> {
        let program = Self { blocks };
        program.validate()?;
        Ok(program)
    }

    /// Statements in order.
    pub fn blocks(&self) -> &[Stmt] {
        &self.blocks
    }

    /// Returns true for a program with no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Parses and validates a JSON program.
    #[instrument(skip(text))]
    pub fn from_json(text: &str) -> Result<Self, ProgramError> {
        let program: Self = serde_json::from_str(text)
            .map_err(|e| ProgramError::new(format!("Failed to parse program JSON: {}", e)))?;
        program.validate()?;
        Ok(program)
    }

    /// Parses and validates a TOML program.
    #[instrument(skip(text))]
    pub fn from_toml(text: &str) -> Result<Self, ProgramError> {
        let program: Self = toml::from_str(text)
            .map_err(|e| ProgramError::new(format!("Failed to parse program TOML: {}", e)))?;
        program.validate()?;
        Ok(program)
    }

    /// Loads a program file; `.toml` files are read as TOML, anything else as JSON.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProgramError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ProgramError::new(format!("Failed to read program file: {}", e)))?;
        let program = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&text)?,
            _ => Self::from_json(&text)?,
        };
        debug!(blocks = program.blocks.len(), "Program loaded");
        Ok(program)
    }

    /// Checks structure that the type system cannot: loop-only statements
    /// appear inside loops and variable names are non-empty.
    pub fn validate(&self) -> Result<(), ProgramError> {
        validate_block(&self.blocks, false)
    }
}

fn validate_block(block: &[Stmt], in_loop: bool) -> Result<(), ProgramError> {
    block.iter().try_for_each(|stmt| validate_stmt(stmt, in_loop))
}

fn validate_stmt(stmt: &Stmt, in_loop: bool) -> Result<(), ProgramError> {
    match stmt {
        Stmt::Break | Stmt::Continue if !in_loop => Err(ProgramError::new(
            "'break' and 'continue' must be inside a loop",
        )),
        Stmt::Set { var, value } => {
            check_name(var)?;
            validate_expr(value)
        }
        Stmt::PlaceMarkAt { row, col } => {
            validate_expr(row)?;
            validate_expr(col)
        }
        Stmt::SetDifficulty { level } => validate_expr(level),
        Stmt::If {
            cond,
            then,
            otherwise,
        } => {
            validate_expr(cond)?;
            validate_block(then, in_loop)?;
            validate_block(otherwise, in_loop)
        }
        Stmt::Repeat { times, body } => {
            validate_expr(times)?;
            validate_block(body, true)
        }
        Stmt::While { cond, body, .. } => {
            validate_expr(cond)?;
            validate_block(body, true)
        }
        Stmt::For {
            var,
            from,
            to,
            by,
            body,
        } => {
            check_name(var)?;
            validate_expr(from)?;
            validate_expr(to)?;
            by.as_ref().map_or(Ok(()), validate_expr)?;
            validate_block(body, true)
        }
        Stmt::Forever { body } => validate_block(body, true),
        Stmt::PlaceMarkRandomly | Stmt::EndTurn | Stmt::Break | Stmt::Continue => Ok(()),
    }
}

fn validate_expr(expr: &Expr) -> Result<(), ProgramError> {
    match expr {
        Expr::Var(name) => check_name(name),
        Expr::Not(inner) => validate_expr(inner),
        Expr::IsSquareEmpty { row: a, col: b }
        | Expr::RandomInt { from: a, to: b }
        | Expr::Logic { lhs: a, rhs: b, .. }
        | Expr::Compare { lhs: a, rhs: b, .. }
        | Expr::Arith { lhs: a, rhs: b, .. } => {
            validate_expr(a)?;
            validate_expr(b)
        }
        Expr::Number(_) | Expr::Bool(_) | Expr::HasPlayerMoved => Ok(()),
    }
}

fn check_name(name: &str) -> Result<(), ProgramError> {
    if name.trim().is_empty() {
        return Err(ProgramError::new("Variable names must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_nested_json() {
        let program = Program::from_json(
            r#"{"blocks": [
                {"op": "forever", "body": [
                    {"op": "if",
                     "cond": {"not": "has_player_moved"},
                     "then": [{"op": "place_mark_randomly"}]},
                    {"op": "end_turn"}
                ]}
            ]}"#,
        )
        .unwrap();

        let Stmt::Forever { body } = &program.blocks()[0] else {
            panic!("expected forever block");
        };
        assert_eq!(body.len(), 2);
        assert_eq!(
            body[0],
            Stmt::If {
                cond: Expr::Not(Box::new(Expr::HasPlayerMoved)),
                then: vec![Stmt::PlaceMarkRandomly],
                otherwise: vec![],
            }
        );
    }

    #[test]
    fn test_parses_toml() {
        let program = Program::from_toml(
            r#"
            [[blocks]]
            op = "set_difficulty"
            level = { number = 5 }

            [[blocks]]
            op = "place_mark_at"
            row = { number = 2 }
            col = { var = "c" }
            "#,
        )
        .unwrap();
        assert_eq!(
            program.blocks()[1],
            Stmt::PlaceMarkAt {
                row: Expr::Number(2),
                col: Expr::Var("c".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_blocks_mean_empty_program() {
        let program = Program::from_json("{}").unwrap();
        assert!(program.is_empty());
        assert!(!Program::new(vec![Stmt::EndTurn]).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_break_outside_loop() {
        let err = Program::new(vec![Stmt::If {
            cond: Expr::Bool(true),
            then: vec![Stmt::Break],
            otherwise: vec![],
        }])
        .unwrap_err();
        assert!(err.message.contains("inside a loop"));

        assert!(
            Program::new(vec![Stmt::Repeat {
                times: Expr::Number(2),
                body: vec![Stmt::If {
                    cond: Expr::Bool(true),
                    then: vec![Stmt::Break],
                    otherwise: vec![],
                }],
            }])
            .is_ok()
        );
    }

    #[test]
    fn test_rejects_empty_variable_names() {
        assert!(
            Program::new(vec![Stmt::Set {
                var: " ".to_string(),
                value: Expr::Number(1),
            }])
            .is_err()
        );
        assert!(Program::from_json(r#"{"blocks": [{"op": "teleport"}]}"#).is_err());
    }

    #[test]
    fn test_load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("center.toml");
        std::fs::write(
            &path,
            "[[blocks]]\nop = \"place_mark_at\"\nrow = { number = 2 }\ncol = { number = 2 }\n",
        )
        .unwrap();
        assert_eq!(Program::load(&path).unwrap().blocks().len(), 1);

        let missing = Program::load(dir.path().join("missing.json")).unwrap_err();
        assert!(missing.message.contains("Failed to read"));
    }
}
