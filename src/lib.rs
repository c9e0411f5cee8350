//! # ratcalc
//!
//! ratcalc is a line-oriented calculator language evaluated under exact
//! rational arithmetic, with dimensional units, time and timezone
//! handling, and display-format conversions (hex/bin/oct, `Hh Mm Ss`,
//! unix timestamps, currency).
//!
//! Every input line is an independent expression or assignment. The crate
//! provides the language core — lexer, parser, evaluator, unit engine,
//! time model, formatter — and the incremental multi-line evaluator that
//! maintains a per-line cache with dependency tracking, so hosts can
//! re-render a whole buffer cheaply on each edit or clock tick.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed lines.
///
/// This module declares the `Expr` enum and related types that represent
/// a line's syntactic structure as a tree. The AST is built by the parser
/// and traversed by both the evaluator and the incremental engine's
/// dependency walker.
///
/// # Responsibilities
/// - Defines expression variants for every language construct.
/// - Keeps traversals exhaustive through a single tagged sum type.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors a line can raise. The `Display` output
/// of each error doubles as the rendered gutter text, so messages are
/// bare lowercase phrases matched by substring; the `__forex__` sentinel
/// is the one machine-readable message.
///
/// # Responsibilities
/// - Defines error enums for both phases (lexing/parsing, evaluation).
/// - Carries enough structure for hosts to classify failures.
pub mod error;
/// Orchestrates the entire evaluation pipeline.
///
/// This module ties together lexing, parsing, evaluation, the unit and
/// timezone catalogues, value representation and formatting, and the
/// incremental buffer engine.
///
/// # Responsibilities
/// - Coordinates the core components: lexer, parser, evaluator, units,
///   time, values, incremental cache.
/// - Provides the entry points for single lines and whole buffers.
pub mod interpreter;
/// General utilities for exact numeric work.
///
/// This module provides the rational-number helpers shared across
/// phases: literal parsing, rounding modes, decimal and scientific
/// rendering, and `f64` bridging.
///
/// # Responsibilities
/// - Converts literals and floats to `BigRational` without silent loss.
/// - Renders rationals in the formats the formatter needs.
pub mod util;

pub use error::{Error, EvalError, ParseError};
pub use interpreter::{
    evaluator::core::{Env, eval_line},
    incremental::{EvalState, LineResult},
    lexer::{Lexeme, Token, lex},
    parser::core::parse_line,
    timezone::{is_timezone, lookup_timezone},
    units::lookup_unit,
    value::core::Value,
};
