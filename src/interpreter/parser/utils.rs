use std::iter::Peekable;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    ast::{BinaryOp, Expr},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{binary::parse_expression, core::ParseResult},
        units::{CompoundUnit, seconds_unit},
    },
    util::num::rat_from_digits,
};

/// Parses a parenthesized, comma-separated argument list. The opening
/// `(` has already been consumed; the closing `)` is consumed here.
pub fn parse_args<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Expr>>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut args = Vec::new();

    if matches!(tokens.peek(), Some(lex) if lex.kind == Token::RParen) {
        tokens.next();
        return Ok(args);
    }

    args.push(parse_expression(tokens)?);
    while matches!(tokens.peek(), Some(lex) if lex.kind == Token::Comma) {
        tokens.next();
        args.push(parse_expression(tokens)?);
    }

    match tokens.peek() {
        Some(lex) if lex.kind == Token::RParen => {
            tokens.next();
            Ok(args)
        },
        _ => Err(ParseError::ExpectedClosingParen),
    }
}

/// Returns `true` for the AM/PM markers, case-insensitively.
#[must_use]
pub fn is_am_pm(word: &str) -> bool {
    word.eq_ignore_ascii_case("AM") || word.eq_ignore_ascii_case("PM")
}

/// Returns `true` when the node can carry a timestamp, making AM/PM and
/// timezone postfixes meaningful: time literals, function calls, and
/// AM/PM wrappers. Everything else treats those words as variables.
#[must_use]
pub const fn is_time_producing(expr: &Expr) -> bool {
    matches!(expr,
             Expr::TimeOfDay { .. } | Expr::Call { .. } | Expr::AmPm { .. })
}

/// Desugars an `@`-literal into a builtin call.
///
/// - `@2024-01-31` → `date(2024, 1, 31)`
/// - `@2024-01-31T10:30:00` (or with a space) → `date(2024, 1, 31, 10, 30, 0)`
/// - `@2024-01-31 02:30:00 -0800` → the same call minus the offset in
///   seconds, so the stored instant is UTC
/// - `@10:30`, `@10:30:05` → `time(10, 30[, 5])`
/// - `@1706745600` → `unix(1706745600)`
///
/// # Errors
/// [`ParseError::InvalidAtLiteral`] when the literal does not decompose.
pub fn desugar_at_literal(literal: &str) -> ParseResult<Expr> {
    let invalid = || ParseError::InvalidAtLiteral { literal: literal.to_string() };
    let mut raw = literal.get(1..).ok_or_else(invalid)?;

    if raw.contains('-') {
        // Date or date-time, possibly with a trailing ±NNNN offset.
        let mut offset_seconds: i64 = 0;
        if raw.len() >= 6 {
            let tail = &raw[raw.len() - 6..];
            let bytes = tail.as_bytes();
            if bytes[0] == b' '
               && (bytes[1] == b'+' || bytes[1] == b'-')
               && tail[2..].bytes().all(|b| b.is_ascii_digit())
            {
                let hh: i64 = tail[2..4].parse().map_err(|_| invalid())?;
                let mm: i64 = tail[4..6].parse().map_err(|_| invalid())?;
                offset_seconds = hh * 3600 + mm * 60;
                if bytes[1] == b'-' {
                    offset_seconds = -offset_seconds;
                }
                raw = &raw[..raw.len() - 6];
            }
        }

        let (date_part, time_part) = match raw.find(['T', ' ']) {
            Some(idx) => (&raw[..idx], Some(&raw[idx + 1..])),
            None => (raw, None),
        };

        let date_fields: Vec<&str> = date_part.split('-').collect();
        if date_fields.len() != 3 {
            return Err(invalid());
        }
        let mut args = Vec::with_capacity(6);
        for field in date_fields {
            args.push(int_node(field).ok_or_else(invalid)?);
        }
        if let Some(time_part) = time_part {
            let time_fields: Vec<&str> = time_part.split(':').collect();
            if time_fields.len() != 3 {
                return Err(invalid());
            }
            for field in time_fields {
                args.push(int_node(field).ok_or_else(invalid)?);
            }
        }

        let call = Expr::Call { name: "date".to_string(),
                                args };
        if offset_seconds == 0 {
            return Ok(call);
        }
        // The clock fields were read in the given offset; shift the UTC
        // instant back by that offset.
        let offset = Expr::Unit { expr: Box::new(Expr::Number { value:
                                      BigRational::from_integer(BigInt::from(offset_seconds)), }),
                                  unit: CompoundUnit::simple(seconds_unit()), };
        return Ok(Expr::Binary { op:    BinaryOp::Sub,
                                 left:  Box::new(call),
                                 right: Box::new(offset), });
    }

    if raw.contains(':') {
        let fields: Vec<&str> = raw.split(':').collect();
        if fields.len() < 2 || fields.len() > 3 {
            return Err(invalid());
        }
        let mut args = Vec::with_capacity(3);
        for field in fields {
            args.push(int_node(field).ok_or_else(invalid)?);
        }
        return Ok(Expr::Call { name: "time".to_string(),
                               args });
    }

    // A bare digit run is a unix timestamp.
    let value = rat_from_digits(raw).ok_or_else(invalid)?;
    Ok(Expr::Call { name: "unix".to_string(),
                    args: vec![Expr::Number { value }], })
}

fn int_node(digits: &str) -> Option<Expr> {
    rat_from_digits(digits).map(|value| Expr::Number { value })
}
