use std::iter::Peekable;

use num_traits::Zero;

use crate::{
    ast::{BinaryOp, Expr, UnaryOp},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            binary::parse_expression,
            core::ParseResult,
            utils::{desugar_at_literal, is_am_pm, is_time_producing, parse_args},
        },
        timezone::lookup_timezone,
        units::{CompoundUnit, currency_for_symbol, lookup_unit},
    },
    util::num::{rat_from_decimal, rat_from_digits, rat_from_prefixed},
};

/// Parses a unary expression.
///
/// `-` and `~` are right-associative prefixes and bind *looser* than
/// `**`, so `-2 ** 2` parses as `-(2 ** 2)`.
///
/// Grammar:
/// ```text
///     unary := ('-' | '~') unary
///            | exponent
/// ```
pub fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let op = match tokens.peek() {
        Some(lex) if lex.kind == Token::Minus => Some(UnaryOp::Neg),
        Some(lex) if lex.kind == Token::Tilde => Some(UnaryOp::BitNot),
        _ => None,
    };
    if let Some(op) = op {
        tokens.next();
        let operand = parse_unary(tokens)?;
        return Ok(Expr::Unary { op,
                                operand: Box::new(operand) });
    }
    parse_exponent(tokens)
}

/// Parses exponentiation.
///
/// Right-associative through the recursion into [`parse_unary`], which
/// also lets a negative exponent follow directly: `2 ** -3`.
///
/// Grammar: `exponent := postfix ('**' unary)?`
pub fn parse_exponent<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let left = parse_postfix(tokens)?;
    if matches!(tokens.peek(), Some(lex) if lex.kind == Token::StarStar) {
        tokens.next();
        let right = parse_unary(tokens)?;
        return Ok(Expr::Binary { op:    BinaryOp::Pow,
                                 left:  Box::new(left),
                                 right: Box::new(right), });
    }
    Ok(left)
}

/// Parses a primary expression followed by at most one postfix.
///
/// The postfix is one of `!`, `%`, an AM/PM marker optionally followed by
/// a timezone, a bare timezone, or a unit word. AM/PM and timezones are
/// only recognized after time-producing nodes, and AM/PM is checked
/// before the unit lookup so `3:30 pm` never reads as picometres.
///
/// Grammar: `postfix := primary ('!' | '%' | UNIT | AM_PM? TZ_ABBREV?)?`
pub fn parse_postfix<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut node = parse_primary(tokens)?;

    match tokens.peek() {
        Some(lex) if lex.kind == Token::Bang => {
            tokens.next();
            return Ok(Expr::Factorial { expr: Box::new(node) });
        },
        Some(lex) if lex.kind == Token::Percent => {
            tokens.next();
            return Ok(Expr::Percent { expr: Box::new(node) });
        },
        Some(lex) if lex.kind == Token::Word => {},
        _ => return Ok(node),
    }

    // A word postfix: AM/PM first, then timezone, then unit.
    if let Some(lex) = tokens.peek()
       && is_am_pm(&lex.text)
       && is_time_producing(&node)
    {
        let is_pm = lex.text.eq_ignore_ascii_case("PM");
        tokens.next();
        node = Expr::AmPm { expr: Box::new(node),
                            is_pm };
    }

    if let Some(lex) = tokens.peek()
       && lex.kind == Token::Word
       && is_time_producing(&node)
       && let Some(zone) = lookup_timezone(&lex.text)
    {
        tokens.next();
        return Ok(Expr::ZoneIn { expr: Box::new(node),
                                 zone });
    }

    if matches!(&node, Expr::AmPm { .. }) {
        return Ok(node);
    }

    if let Some(lex) = tokens.peek()
       && lex.kind == Token::Word
       && let Some(unit) = lookup_unit(&lex.text)
    {
        tokens.next();
        return Ok(Expr::Unit { expr: Box::new(node),
                               unit: CompoundUnit::simple(unit) });
    }

    Ok(node)
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the grammar:
/// - numeric literals (including decimals, adjacent fractions, and
///   prefixed-base integers)
/// - `@`-literals, desugared to builtin calls
/// - time-of-day literals
/// - parenthesized expressions
/// - `#N` line references
/// - currency prefixes (`$5`, `€(2 + 3)`)
/// - function calls and variable references
///
/// # Parameters
/// - `tokens`: Lexeme iterator positioned at the start of a primary.
///
/// # Returns
/// The parsed primary [`Expr`], or a `ParseError` on failure.
pub fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let Some(lex) = tokens.peek() else {
        return Err(ParseError::UnexpectedEndOfInput);
    };

    match lex.kind {
        Token::Number => parse_number(tokens),
        Token::AtLiteral => {
            let literal = lex.text.clone();
            tokens.next();
            desugar_at_literal(&literal)
        },
        Token::Time => {
            let raw = lex.text.clone();
            tokens.next();
            Ok(Expr::TimeOfDay { raw })
        },
        Token::LParen => {
            tokens.next();
            let expr = parse_expression(tokens)?;
            match tokens.peek() {
                Some(lex) if lex.kind == Token::RParen => {
                    tokens.next();
                    Ok(expr)
                },
                _ => Err(ParseError::ExpectedClosingParen),
            }
        },
        Token::Hash => {
            tokens.next();
            match tokens.peek() {
                Some(lex) if lex.kind == Token::Number => {
                    let name = format!("#{}", lex.text);
                    tokens.next();
                    Ok(Expr::Variable { name })
                },
                _ => Err(ParseError::ExpectedLineNumber),
            }
        },
        Token::Currency => {
            let symbol = lex.text.clone();
            tokens.next();
            let unit = currency_for_symbol(&symbol).ok_or(ParseError::UnexpectedToken { token:
                                                                                            symbol })?;
            let inner = parse_primary(tokens)?;
            Ok(Expr::Unit { expr: Box::new(inner),
                            unit: CompoundUnit::simple(unit), })
        },
        Token::Word => parse_call_or_variable(tokens),
        Token::Eof => Err(ParseError::UnexpectedEndOfInput),
        _ => Err(ParseError::UnexpectedToken { token: lex.text.clone() }),
    }
}

/// Parses a numeric literal, re-associating split parts.
///
/// A `0x`/`0b`/`0o` literal stands alone. Otherwise `NUMBER '.' NUMBER`
/// forms a decimal, and `NUMBER '/' NUMBER` forms a fraction literal
/// only when slash and denominator are byte-adjacent to the integer part;
/// with any spacing the slash is left for the division rule.
fn parse_number<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let Some(int_tok) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput);
    };

    let literal = int_tok.text.as_str();
    if literal.len() >= 2
       && literal.starts_with('0')
       && matches!(literal.as_bytes()[1], b'x' | b'X' | b'b' | b'B' | b'o' | b'O')
    {
        let value = rat_from_prefixed(literal).ok_or_else(|| {
                                                  ParseError::InvalidNumber { literal:
                                                                                  literal.into(), }
                                              })?;
        return Ok(Expr::Number { value });
    }

    // Decimal literal: NUMBER '.' NUMBER.
    if matches!(tokens.peek(), Some(lex) if lex.kind == Token::Dot) {
        tokens.next();
        let frac = match tokens.peek() {
            Some(lex) if lex.kind == Token::Number => lex.text.clone(),
            _ => return Err(ParseError::ExpectedDigitsAfterDot),
        };
        tokens.next();
        let text = format!("{literal}.{frac}");
        let value =
            rat_from_decimal(literal, &frac).ok_or(ParseError::InvalidNumber { literal: text })?;
        return Ok(Expr::Number { value });
    }

    // Fraction literal: NUMBER '/' NUMBER with no intervening bytes.
    let mut lookahead = tokens.clone();
    if let Some(slash) = lookahead.next()
       && slash.kind == Token::Slash
       && let Some(denom) = lookahead.peek()
       && denom.kind == Token::Number
       && slash.pos == int_tok.pos + int_tok.text.len()
       && denom.pos == slash.pos + 1
    {
        let text = format!("{literal}/{}", denom.text);
        let den = rat_from_digits(&denom.text).filter(|d| !d.is_zero())
                                              .ok_or(ParseError::InvalidNumber { literal: text })?;
        let num = rat_from_digits(literal).ok_or_else(|| {
                                              ParseError::InvalidNumber { literal:
                                                                              literal.into(), }
                                          })?;
        tokens.next();
        tokens.next();
        return Ok(Expr::Number { value: num / den });
    }

    let value = rat_from_digits(literal).ok_or_else(|| {
                                            ParseError::InvalidNumber { literal: literal.into() }
                                        })?;
    Ok(Expr::Number { value })
}

/// Parses a word as either a function call (when followed by `(`) or a
/// variable reference.
fn parse_call_or_variable<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let Some(word) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput);
    };
    let name = word.text.clone();

    if matches!(tokens.peek(), Some(lex) if lex.kind == Token::LParen) {
        tokens.next();
        let args = parse_args(tokens)?;
        return Ok(Expr::Call { name, args });
    }

    Ok(Expr::Variable { name })
}
