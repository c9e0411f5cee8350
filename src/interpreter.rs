/// The evaluator module executes AST nodes and computes values.
///
/// The evaluator walks the AST, applies the dimensional and time
/// arithmetic rules, dispatches builtin functions, and produces runtime
/// values. It is the core execution engine of the language.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Enforces unit compatibility, category cancellation, and the
///   time-arithmetic table.
/// - Reports evaluation errors such as division by zero or dimension
///   mismatches.
pub mod evaluator;
/// The incremental module evaluates whole buffers with a per-line cache.
///
/// Lines are re-evaluated only when their text changes, a dependency
/// changes earlier in the pass, or the clock ticks for `now()`-using
/// lines. Results come back in line order as rendered text plus an error
/// flag.
///
/// # Responsibilities
/// - Tracks per-line text, AST, value, error, and dependency records.
/// - Propagates dirtiness through variable and `#N` bindings.
pub mod incremental;
/// The lexer module tokenizes a single line for further parsing.
///
/// The lexer reads the raw line and produces positioned tokens for
/// numbers, words, operators, time and `@`-literals, and currency
/// symbols. Unknown characters are skipped silently.
///
/// # Responsibilities
/// - Converts the input into tokens with kind, literal text, and byte
///   offset.
/// - Resolves the context-heavy literal forms (times, `@`-literals,
///   prefixed integers) greedily at the character level.
pub mod lexer;
/// The parser module builds the abstract syntax tree from tokens.
///
/// The parser processes the token stream with recursive descent over a
/// fixed precedence chain, detects assignments, desugars `@`-literals,
/// and resolves the context-sensitive `to`, timezone, AM/PM, and unit
/// words.
///
/// # Responsibilities
/// - Converts tokens into `Expr` nodes.
/// - Validates grammar and reports parse errors.
pub mod parser;
/// The timezone module holds the fixed abbreviation table.
///
/// # Responsibilities
/// - Maps the supported abbreviations to fixed UTC offsets.
/// - Bridges zones to `chrono` fixed offsets for rendering.
pub mod timezone;
/// The units module holds the immutable unit catalogue.
///
/// # Responsibilities
/// - Defines categories, units, exact to-base factors, and the
///   temperature offsets.
/// - Provides lookup by short, singular, and plural names plus the
///   currency symbol aliases.
pub mod units;
/// The value module defines the runtime value type and its rendering.
///
/// # Responsibilities
/// - Defines the unit-carrying rational pair and display hints.
/// - Implements the display pipeline the gutter text comes from.
pub mod value;
