//! Tree-walking interpreter for block programs.

use super::api::EngineApi;
use super::budget::LoopBudget;
use super::error::{RuntimeFault, SandboxFault};
use super::program::{ArithOp, CompareOp, Expr, LogicOp, Program, Stmt};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, instrument, trace};

/// Runtime value of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// Integer.
    Number(i64),
    /// Boolean.
    Bool(bool),
}

impl Value {
    fn as_number(self) -> Result<i64, RuntimeFault> {
        match self {
            Value::Number(n) => Ok(n),
            Value::Bool(_) => Err(mismatch("number", self)),
        }
    }

    fn as_bool(self) -> Result<bool, RuntimeFault> {
        match self {
            Value::Bool(b) => Ok(b),
            Value::Number(_) => Err(mismatch("boolean", self)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

fn mismatch(expected: &'static str, found: Value) -> RuntimeFault {
    RuntimeFault::TypeMismatch {
        expected,
        found: found.to_string(),
    }
}

/// How a block finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Normal,
    Break,
    Continue,
    /// The board's game ended; nothing more can happen on it.
    Halt,
}

/// Runs one program against one bound board.
///
/// Variables are private to the interpreter; the loop budget is shared with
/// every other interpreter in the same run.
pub struct Interpreter<'a> {
    api: &'a dyn EngineApi,
    budget: &'a LoopBudget,
    vars: HashMap<String, Value>,
}

impl<'a> Interpreter<'a> {
    /// Creates an interpreter bound to `api`.
    pub fn new(api: &'a dyn EngineApi, budget: &'a LoopBudget) -> Self {
        Self {
            api,
            budget,
            vars: HashMap::new(),
        }
    }

    /// Value of a variable after the run, if it was set.
    pub fn var(&self, name: &str) -> Option<Value> {
        self.vars.get(name).copied()
    }

    /// Executes the whole program. Stops early once the bound game is over.
    #[instrument(skip_all, fields(blocks = program.blocks().len()))]
    pub async fn run(&mut self, program: &Program) -> Result<(), SandboxFault> {
        if self.api.is_game_over() {
            debug!("Board already finished; nothing to run");
            return Ok(());
        }
        let flow = self.exec_block(program.blocks()).await?;
        debug!(?flow, remaining = self.budget.remaining(), "Program finished");
        Ok(())
    }

    fn exec_block<'s>(
        &'s mut self,
        block: &'s [Stmt],
    ) -> LocalBoxFuture<'s, Result<Flow, SandboxFault>> {
        async move {
            for stmt in block {
                let flow = self.exec_stmt(stmt).await?;
                if flow != Flow::Normal {
                    return Ok(flow);
                }
            }
            Ok(Flow::Normal)
        }
        .boxed_local()
    }

    async fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow, SandboxFault> {
        trace!(?stmt, "Executing");
        match stmt {
            Stmt::PlaceMarkAt { row, col } => {
                let row = self.eval(row)?.as_number()?;
                let col = self.eval(col)?.as_number()?;
                self.api.place_mark_at(row, col).await;
                Ok(self.after_board_update())
            }
            Stmt::PlaceMarkRandomly => {
                self.api.place_mark_randomly().await;
                Ok(self.after_board_update())
            }
            Stmt::SetDifficulty { level } => {
                let level = self.eval(level)?.as_number()?;
                self.api.set_difficulty(level);
                Ok(Flow::Normal)
            }
            Stmt::EndTurn => {
                self.api.end_turn().await;
                Ok(self.after_board_update())
            }
            Stmt::Set { var, value } => {
                let value = self.eval(value)?;
                self.vars.insert(var.clone(), value);
                Ok(Flow::Normal)
            }
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                let branch = if self.eval(cond)?.as_bool()? {
                    then
                } else {
                    otherwise
                };
                self.exec_block(branch).await
            }
            Stmt::Repeat { times, body } => {
                let times = self.eval(times)?.as_number()?;
                for _ in 0..times.max(0) {
                    self.budget.tick()?;
                    match self.exec_block(body).await? {
                        Flow::Break => break,
                        Flow::Halt => return Ok(Flow::Halt),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::While { cond, body, until } => {
                while self.eval(cond)?.as_bool()? != *until {
                    self.budget.tick()?;
                    match self.exec_block(body).await? {
                        Flow::Break => break,
                        Flow::Halt => return Ok(Flow::Halt),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::For {
                var,
                from,
                to,
                by,
                body,
            } => {
                let start = self.eval(from)?.as_number()?;
                let end = self.eval(to)?.as_number()?;
                let magnitude = match by {
                    Some(by) => self
                        .eval(by)?
                        .as_number()?
                        .checked_abs()
                        .ok_or(RuntimeFault::Overflow)?,
                    None => 1,
                };
                let ascending = start <= end;
                let step = if ascending { magnitude } else { -magnitude };

                let mut counter = start;
                self.vars.insert(var.clone(), Value::Number(counter));
                while (ascending && counter <= end) || (!ascending && counter >= end) {
                    self.budget.tick()?;
                    match self.exec_block(body).await? {
                        Flow::Break => break,
                        Flow::Halt => return Ok(Flow::Halt),
                        Flow::Normal | Flow::Continue => {}
                    }
                    // The body may have reassigned the counter.
                    counter = self
                        .read_var(var)?
                        .as_number()?
                        .checked_add(step)
                        .ok_or(RuntimeFault::Overflow)?;
                    self.vars.insert(var.clone(), Value::Number(counter));
                }
                Ok(Flow::Normal)
            }
            Stmt::Forever { body } => loop {
                self.budget.tick()?;
                match self.exec_block(body).await? {
                    Flow::Break => return Ok(Flow::Normal),
                    Flow::Halt => return Ok(Flow::Halt),
                    Flow::Normal | Flow::Continue => {}
                }
            },
            Stmt::Break => Ok(Flow::Break),
            Stmt::Continue => Ok(Flow::Continue),
        }
    }

    fn after_board_update(&self) -> Flow {
        if self.api.is_game_over() {
            debug!("Game over; halting program");
            Flow::Halt
        } else {
            Flow::Normal
        }
    }

    fn read_var(&self, name: &str) -> Result<Value, RuntimeFault> {
        self.vars
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeFault::UnknownVariable(name.to_string()))
    }

    fn eval(&self, expr: &Expr) -> Result<Value, RuntimeFault> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Var(name) => self.read_var(name),
            Expr::IsSquareEmpty { row, col } => {
                let row = self.eval(row)?.as_number()?;
                let col = self.eval(col)?.as_number()?;
                Ok(Value::Bool(self.api.is_square_empty(row, col)))
            }
            Expr::HasPlayerMoved => Ok(Value::Bool(self.api.has_player_moved())),
            Expr::Not(inner) => Ok(Value::Bool(!self.eval(inner)?.as_bool()?)),
            Expr::Logic { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?.as_bool()?;
                let result = match op {
                    LogicOp::And => lhs && self.eval(rhs)?.as_bool()?,
                    LogicOp::Or => lhs || self.eval(rhs)?.as_bool()?,
                };
                Ok(Value::Bool(result))
            }
            Expr::Compare { op, lhs, rhs } => {
                let (lhs, rhs) = (self.eval(lhs)?, self.eval(rhs)?);
                compare(*op, lhs, rhs).map(Value::Bool)
            }
            Expr::Arith { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?.as_number()?;
                let rhs = self.eval(rhs)?.as_number()?;
                arith(*op, lhs, rhs).map(Value::Number)
            }
            Expr::RandomInt { from, to } => {
                let lo = self.eval(from)?.as_number()?;
                let hi = self.eval(to)?.as_number()?;
                Ok(Value::Number(self.api.random_int(lo, hi)))
            }
        }
    }
}

fn compare(op: CompareOp, lhs: Value, rhs: Value) -> Result<bool, RuntimeFault> {
    match op {
        CompareOp::Eq | CompareOp::Neq => {
            let equal = match (lhs, rhs) {
                (Value::Number(a), Value::Number(b)) => a == b,
                (Value::Bool(a), Value::Bool(b)) => a == b,
                (Value::Number(_), other) => return Err(mismatch("number", other)),
                (Value::Bool(_), other) => return Err(mismatch("boolean", other)),
            };
            Ok(equal == (op == CompareOp::Eq))
        }
        CompareOp::Lt | CompareOp::Lte | CompareOp::Gt | CompareOp::Gte => {
            let (a, b) = (lhs.as_number()?, rhs.as_number()?);
            Ok(match op {
                CompareOp::Lt => a < b,
                CompareOp::Lte => a <= b,
                CompareOp::Gt => a > b,
                _ => a >= b,
            })
        }
    }
}

fn arith(op: ArithOp, lhs: i64, rhs: i64) -> Result<i64, RuntimeFault> {
    if matches!(op, ArithOp::Div | ArithOp::Mod) && rhs == 0 {
        return Err(RuntimeFault::DivisionByZero);
    }
    let result = match op {
        ArithOp::Add => lhs.checked_add(rhs),
        ArithOp::Sub => lhs.checked_sub(rhs),
        ArithOp::Mul => lhs.checked_mul(rhs),
        ArithOp::Div => lhs.checked_div(rhs),
        ArithOp::Mod => lhs.checked_rem(rhs),
    };
    result.ok_or(RuntimeFault::Overflow)
}
