/// Line-level parsing: entry point, assignment detection, and the
/// context-sensitive `to` conversion layer.
pub mod core;

/// The binary-operator precedence chain, from bitwise OR down to
/// multiplication and division.
pub mod binary;

/// Unary operators, exponentiation, postfix handling (factorial, percent,
/// units, AM/PM, timezones), and primary expressions.
pub mod unary;

/// Parsing helpers: argument lists, `@`-literal desugaring, and the
/// time-producing-node classification used by postfix rules.
pub mod utils;
