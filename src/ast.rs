use num_rational::BigRational;

use crate::interpreter::{timezone::Zone, units::CompoundUnit};

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Exponentiation (`**`), right-associative
    Pow,
    /// Bitwise AND (`&`)
    BitAnd,
    /// Bitwise OR (`|`)
    BitOr,
    /// Bitwise XOR (`^`)
    BitXor,
    /// Left shift (`<<`)
    Shl,
    /// Right shift (`>>`)
    Shr,
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`)
    Neg,
    /// Bitwise NOT (`~x`), two's complement on arbitrary-precision
    /// integers
    BitNot,
}

/// The target of a trailing `to` conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvTarget {
    /// Convert to a unit or compound unit, e.g. `to km/L`.
    Unit(CompoundUnit),
    /// Change the display timezone of a timestamp, e.g. `to PST`. The
    /// stored instant is unchanged.
    Zone(&'static Zone),
    /// Strip a timestamp down to its unix seconds, e.g. `to unix`.
    Unix,
    /// Display an integer in hexadecimal.
    Hex,
    /// Display an integer in binary.
    Bin,
    /// Display an integer in octal.
    Oct,
    /// Display a duration or plain seconds count as `Hh Mm Ss`.
    Hms,
}

/// An abstract syntax tree node for a single line.
///
/// Each variant models one syntactic construct. The same tagged shape is
/// traversed by the evaluator and by the incremental engine's dependency
/// walker, so adding a variant extends both exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal, held as an exact rational. Integer, decimal,
    /// fraction, and prefixed-base literals all collapse to this.
    Number {
        /// The literal's exact value.
        value: BigRational,
    },
    /// A reference to a variable, a line reference (`#3`), a constant, or
    /// a bare unit name.
    Variable {
        /// The referenced name; line references keep their `#` prefix.
        name: String,
    },
    /// A unary operation.
    Unary {
        /// The operator to apply.
        op:      UnaryOp,
        /// The operand expression.
        operand: Box<Self>,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op:    BinaryOp,
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// A unit annotation or attachment, e.g. `5 m` or the `$` prefix
    /// desugaring.
    Unit {
        /// The annotated expression.
        expr: Box<Self>,
        /// The unit to attach or convert to.
        unit: CompoundUnit,
    },
    /// An assignment `name = expr`.
    Assign {
        /// The variable name; always starts with a letter.
        name: String,
        /// The assigned expression.
        expr: Box<Self>,
    },
    /// A function call such as `now()` or `date(2024, 1, 31)`.
    /// `@`-literals desugar to calls of `date`, `time`, or `unix`.
    Call {
        /// The function name.
        name: String,
        /// Argument expressions.
        args: Vec<Self>,
    },
    /// A time-of-day literal such as `14:30`, materialized on today's UTC
    /// date at evaluation time.
    TimeOfDay {
        /// The raw literal text, e.g. `"14:30:00"`.
        raw: String,
    },
    /// An input-timezone postfix on a time-producing expression, e.g.
    /// `12:00 PST`: the clock reading is in the named zone.
    ZoneIn {
        /// The wrapped time expression.
        expr: Box<Self>,
        /// The zone the clock reading belongs to.
        zone: &'static Zone,
    },
    /// An AM/PM postfix on a time-producing expression.
    AmPm {
        /// The wrapped time expression.
        expr:  Box<Self>,
        /// `true` for PM, `false` for AM.
        is_pm: bool,
    },
    /// A percent postfix: divides by 100, producing a dimensionless
    /// rational.
    Percent {
        /// The wrapped expression.
        expr: Box<Self>,
    },
    /// A factorial postfix (`5!`).
    Factorial {
        /// The wrapped expression.
        expr: Box<Self>,
    },
    /// A trailing `to` conversion.
    Convert {
        /// The converted expression.
        expr:   Box<Self>,
        /// What to convert to.
        target: ConvTarget,
    },
}
