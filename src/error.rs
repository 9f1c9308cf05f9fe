use crate::parse_error::ParseError;
use std::fmt;

/// An execution-time failure that terminates a `run`/`run_code` call.
///
/// Per SPEC_FULL.md §7, only three conditions reach this level; everything
/// else (insufficient operands, clamped indices, division by zero, a
/// program-size overflow in `CODE.APPEND`) is absorbed as a silent no-op by
/// the instruction itself and never surfaces here.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionError {
    /// `step_count` reached `eval_push_limit` while `exec` was still
    /// non-empty.
    ExecLimitExceeded { step_count: u64 },

    /// A literal token parsed as a value whose matching stack is disabled
    /// (e.g. a float token while the float stack was never registered).
    DisabledStackLiteral { token: String, stack: &'static str },

    /// An instruction token of the form `stack.op` named a stack that does
    /// not exist, or an op not defined on that stack.
    UnknownInstruction { token: String },
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::ExecLimitExceeded { step_count } => {
                write!(f, "exec limit exceeded after {} steps", step_count)
            }
            ExecutionError::DisabledStackLiteral { token, stack } => write!(
                f,
                "literal `{}` requires the `{}` stack, which is disabled",
                token, stack
            ),
            ExecutionError::UnknownInstruction { token } => {
                write!(f, "unknown instruction `{}`", token)
            }
        }
    }
}

impl std::error::Error for ExecutionError {}

/// The unified error type returned by `Interpreter::run`/`run_code`.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Parse(ParseError),
    Execution(ExecutionError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{}", e),
            Error::Execution(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<ExecutionError> for Error {
    fn from(e: ExecutionError) -> Self {
        Error::Execution(e)
    }
}
