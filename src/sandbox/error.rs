//! Faults raised while loading or running learner programs.

use derive_more::{Display, Error};

/// Fault that aborts one board's run.
///
/// Invalid placements never show up here: the engine ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SandboxFault {
    /// The shared loop budget reached zero.
    #[display("Infinite loop: gave up after {cap} loop iterations")]
    InfiniteLoop {
        /// Budget the run started with.
        cap: u32,
    },
    /// Any other evaluation failure.
    #[display("Runtime fault: {_0}")]
    Runtime(RuntimeFault),
}

impl std::error::Error for SandboxFault {}

impl From<RuntimeFault> for SandboxFault {
    fn from(fault: RuntimeFault) -> Self {
        SandboxFault::Runtime(fault)
    }
}

/// Evaluation failure inside a program.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RuntimeFault {
    /// A variable was read before it was set.
    #[display("variable '{_0}' is not set")]
    UnknownVariable(String),
    /// An operator received the wrong kind of value.
    #[display("expected a {expected}, got {found}")]
    TypeMismatch {
        /// Kind the operator needs.
        expected: &'static str,
        /// What it got.
        found: String,
    },
    /// Division or remainder by zero.
    #[display("division by zero")]
    DivisionByZero,
    /// Integer arithmetic left the representable range.
    #[display("number too large")]
    Overflow,
}

impl std::error::Error for RuntimeFault {}

/// Malformed program text, with the location that raised it.
#[derive(Debug, Clone, Display, Error)]
#[display("Program error: {} at {}:{}", message, file, line)]
pub struct ProgramError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProgramError {
    /// Creates a new program error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_fault_converts() {
        let fault: SandboxFault = RuntimeFault::DivisionByZero.into();
        assert_eq!(fault, SandboxFault::Runtime(RuntimeFault::DivisionByZero));
        assert_eq!(fault.to_string(), "Runtime fault: division by zero");
    }

    #[test]
    fn test_program_error_tracks_caller() {
        let err = ProgramError::new("bad block");
        assert_eq!(err.message, "bad block");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.to_string().starts_with("Program error: bad block at "));
    }
}
