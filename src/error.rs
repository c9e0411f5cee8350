/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of a
/// line. Parse errors include syntax mistakes, unexpected tokens, and
/// invalid literals.
pub mod parse_error;
/// Evaluation errors.
///
/// Contains all error types that can be raised while evaluating a parsed
/// line: division by zero, dimension mismatches, time-arithmetic
/// violations, and domain failures.
pub mod eval_error;

pub use eval_error::EvalError;
pub use parse_error::ParseError;

/// Any error a single line can produce, from either phase.
///
/// This is what the one-shot [`crate::eval_line`] entry point returns;
/// the incremental engine stores the rendered message instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The line failed to parse.
    Parse(ParseError),
    /// The line parsed but failed to evaluate.
    Eval(EvalError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => e.fmt(f),
            Self::Eval(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Self::Eval(e)
    }
}
