/// Core evaluation logic.
///
/// Contains the environment type, the expression dispatcher, constant and
/// bare-unit name resolution, and the one-shot line entry point.
pub mod core;

/// Binary and unary value arithmetic.
///
/// Implements addition and subtraction with dimension checking,
/// multiplication and division with category cancellation, exponents,
/// bitwise operators, shifts, percent, and factorial.
pub mod binary;

/// Conversion evaluation.
///
/// Applies unit attachments and `to` conversions: unit and compound-unit
/// changes, temperature's offset path, currency relabels, and the
/// unix/hex/bin/oct/hms display commands.
pub mod convert;

/// Time evaluation.
///
/// Time-of-day literals, AM/PM and input-timezone postfixes, the time
/// builtins (`now`, `date`, `time`, `unix`), and the component
/// extractors.
pub mod time;

/// Builtin function dispatch.
///
/// Declares the builtin table with arity checking and the adapters that
/// bridge argument values into f64 math, exact rational helpers, and the
/// finance formulas.
pub mod function;
