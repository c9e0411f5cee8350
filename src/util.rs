/// Exact rational helpers.
///
/// This module provides the numeric routines shared by the parser, the
/// evaluator, and the formatter: literal-to-rational parsing, rounding
/// modes, integer extraction, decimal and scientific rendering, and the
/// bridges between `BigRational` and `f64`.
pub mod num;
