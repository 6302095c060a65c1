//! Shared loop-iteration budget.

use super::error::SandboxFault;
use std::cell::Cell;
use tracing::warn;

/// Iterations left for one run, shared by every board's interpreter.
///
/// Each loop iteration decrements the counter; the decrement that reaches
/// zero faults, so a cap of `n` allows `n - 1` full iterations.
#[derive(Debug)]
pub struct LoopBudget {
    cap: u32,
    remaining: Cell<u32>,
}

impl LoopBudget {
    /// Default cap.
    pub const DEFAULT_CAP: u32 = 1000;

    /// Creates a budget holding `cap` iterations.
    pub fn new(cap: u32) -> Self {
        Self {
            cap,
            remaining: Cell::new(cap),
        }
    }

    /// Budget the run started with.
    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// Iterations still available.
    pub fn remaining(&self) -> u32 {
        self.remaining.get()
    }

    /// Decrements performed so far.
    pub fn consumed(&self) -> u32 {
        self.cap - self.remaining.get()
    }

    /// Spends one iteration.
    pub fn tick(&self) -> Result<(), SandboxFault> {
        let left = self.remaining.get().saturating_sub(1);
        self.remaining.set(left);
        if left == 0 {
            warn!(cap = self.cap, "Loop budget exhausted");
            return Err(SandboxFault::InfiniteLoop { cap: self.cap });
        }
        Ok(())
    }
}

impl Default for LoopBudget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAP)
    }
}
