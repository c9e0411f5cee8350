#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during evaluation.
///
/// As with [`super::ParseError`], the `Display` text is the rendered
/// gutter output. The one machine-recognizable message is
/// [`Self::ForexUnsupported`], which renders as the `__forex__` sentinel
/// so hosts can localize a "no exchange rates" notice.
pub enum EvalError {
    /// Attempted division by zero.
    DivisionByZero,
    /// Referenced a name that is not bound, not a constant, and not a
    /// unit.
    UndefinedVariable {
        /// The unresolved name.
        name: String,
    },
    /// Called a function that does not exist.
    UnknownFunction {
        /// The unresolved function name.
        name: String,
    },
    /// A function was called with the wrong number of arguments.
    ArityMismatch {
        /// The function name.
        name:     String,
        /// Human-readable arity description, e.g. `"2 arguments"`.
        expected: &'static str,
    },
    /// An operation received a value of the wrong kind, e.g. a math
    /// function applied to a unit-bearing value.
    TypeMismatch {
        /// What was violated.
        details: String,
    },
    /// A conversion between incompatible dimensions, e.g. `5 m to kg`.
    IncompatibleUnits {
        /// Display string of the source compound unit.
        from: String,
        /// Display string of the requested compound unit.
        to:   String,
    },
    /// Addition or subtraction of values with mismatched dimensions.
    UnitMismatch {
        /// `"add"` or `"subtract"`.
        op:    &'static str,
        /// Display string of the left compound unit.
        left:  String,
        /// Display string of the right compound unit.
        right: String,
    },
    /// Addition or subtraction mixing a unit-bearing value with a plain
    /// number.
    MixedUnits {
        /// `"add"` or `"subtract"`.
        op: &'static str,
    },
    /// A multiplication or division would leave more than one category on
    /// a side of the compound unit.
    CannotCombineUnits,
    /// Adding two timestamps.
    TimestampPair {
        /// `"add"` — subtraction of two timestamps is a duration instead.
        op: &'static str,
    },
    /// Adding or subtracting a non-duration to/from a timestamp.
    TimestampNeedsDuration {
        /// `"add to"` or `"subtract from"`.
        op: &'static str,
    },
    /// Multiplying or dividing a timestamp.
    TimestampScaling,
    /// Subtracting a timestamp from a non-timestamp.
    TimestampFromScalar,
    /// A temperature unit appeared in a compound position, e.g. `100 C / s`.
    TemperatureInCompound,
    /// A conversion between two different currencies was requested; no
    /// exchange-rate table exists.
    ForexUnsupported,
    /// A timezone or AM/PM modifier was applied to a non-time value.
    NotATime {
        /// The modifier, e.g. `"timezone"` or `"AM/PM"`.
        what: &'static str,
    },
    /// Time-of-day components were out of range (hour ≥ 24, minute ≥ 60,
    /// second ≥ 60).
    InvalidTime {
        /// The offending literal or call description.
        details: String,
    },
    /// Date components did not form a real calendar date.
    InvalidDate,
    /// A function's arguments must be integers but were not.
    IntegerArguments {
        /// The function name.
        name: String,
    },
    /// A bitwise operation, shift, or base conversion needed integer
    /// operands.
    IntegerRequired {
        /// The operator or conversion, e.g. `"&"` or `"to hex"`.
        op: &'static str,
    },
    /// A shift by a negative count.
    NegativeShift,
    /// A shift count too large to materialize.
    ShiftTooLarge,
    /// Factorial of a negative or fractional value.
    InvalidFactorial,
    /// Factorial above the safety cap of 10000.
    FactorialTooLarge,
    /// A floating-point computation produced a non-finite result or an
    /// exponent was out of range.
    OutOfRange {
        /// The operation name.
        name: String,
    },
    /// `to hms` on a value that is neither a duration nor dimensionless.
    HmsRequiresTime,
    /// `to unix` on a value that is not a timestamp.
    UnixRequiresTime,
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::UnknownFunction { name } => write!(f, "unknown function: {name}"),
            Self::ArityMismatch { name, expected } => write!(f, "{name}() takes {expected}"),
            Self::TypeMismatch { details } => write!(f, "{details}"),
            Self::IncompatibleUnits { from, to } => write!(f, "cannot convert {from} to {to}"),
            Self::UnitMismatch { op, left, right } => {
                write!(f, "cannot {op} {left} and {right}")
            },
            Self::MixedUnits { op } => {
                write!(f, "cannot {op} values with and without units")
            },
            Self::CannotCombineUnits => write!(f, "cannot combine units"),
            Self::TimestampPair { op } => write!(f, "cannot {op} two timestamps"),
            Self::TimestampNeedsDuration { op } => write!(f,
                                                          "cannot {op} a timestamp: use a time unit (s, min, hr, d, etc.)"),
            Self::TimestampScaling => write!(f, "cannot multiply or divide timestamps"),
            Self::TimestampFromScalar => {
                write!(f, "cannot subtract a timestamp from a non-time value")
            },
            Self::TemperatureInCompound => {
                write!(f, "temperature units cannot be used in compound units")
            },
            Self::ForexUnsupported => write!(f, "__forex__"),
            Self::NotATime { what } => write!(f, "{what} can only be applied to time values"),
            Self::InvalidTime { details } => write!(f, "invalid time: {details}"),
            Self::InvalidDate => write!(f, "invalid date"),
            Self::IntegerArguments { name } => write!(f, "{name}() arguments must be integers"),
            Self::IntegerRequired { op } => write!(f, "{op} requires integer operands"),
            Self::NegativeShift => write!(f, "shift count must be non-negative"),
            Self::ShiftTooLarge => write!(f, "shift count too large"),
            Self::InvalidFactorial => write!(f, "! requires a non-negative integer"),
            Self::FactorialTooLarge => write!(f, "! argument too large"),
            Self::OutOfRange { name } => write!(f, "{name}: result out of range"),
            Self::HmsRequiresTime => {
                write!(f, "to hms requires a time or dimensionless value")
            },
            Self::UnixRequiresTime => write!(f, "to unix requires a time value"),
        }
    }
}

impl std::error::Error for EvalError {}
