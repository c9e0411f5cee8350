use std::iter::Peekable;

use crate::{
    ast::{ConvTarget, Expr},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token, lex},
        parser::binary::parse_expression,
        timezone::lookup_timezone,
        units::{CompoundUnit, lookup_unit, number_unit},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Lexes and parses a single line.
///
/// # Errors
/// Returns a [`ParseError`] when the line is malformed.
///
/// # Example
/// ```
/// use ratcalc::parse_line;
///
/// assert!(parse_line("1/3 + x").unwrap().is_some());
/// assert!(parse_line("   ").unwrap().is_none());
/// assert!(parse_line("(1 + 2").is_err());
/// ```
pub fn parse_line(line: &str) -> ParseResult<Option<Expr>> {
    parse(&lex(line))
}

/// Parses a token sequence into an AST node.
///
/// Returns `Ok(None)` for a blank line (nothing but the `Eof`
/// terminator). A line is an assignment exactly when it begins with a
/// letter-initial word followed by `=`; everything else is a
/// conversion-or-expression.
///
/// # Errors
/// Returns a [`ParseError`] when the tokens do not form a valid line.
pub fn parse(tokens: &[Lexeme]) -> ParseResult<Option<Expr>> {
    if tokens.iter().all(|l| l.kind == Token::Eof) {
        return Ok(None);
    }

    if is_assignment(tokens) {
        let name = tokens[0].text.clone();
        let mut rest = tokens[2..].iter().peekable();
        let expr = parse_expression(&mut rest)?;
        let expr = parse_conversion(&mut rest, expr)?;
        expect_end(&mut rest)?;
        return Ok(Some(Expr::Assign { name,
                                      expr: Box::new(expr) }));
    }

    let mut iter = tokens.iter().peekable();
    let expr = parse_expression(&mut iter)?;
    let expr = parse_conversion(&mut iter, expr)?;
    expect_end(&mut iter)?;
    Ok(Some(expr))
}

/// Detects the assignment form `WORD '=' …` where the word begins with a
/// letter. `#1 = 2` and `3 = 4` stay expressions (and then fail to
/// parse), while `to = 5` is a legitimate assignment since `to` is only
/// promoted to a keyword in conversion position.
fn is_assignment(tokens: &[Lexeme]) -> bool {
    tokens.len() >= 2
    && tokens[0].kind == Token::Word
    && tokens[1].kind == Token::Equals
    && tokens[0].text.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Requires that nothing but `Eof` remains.
fn expect_end<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<()>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    match tokens.peek() {
        None => Ok(()),
        Some(lex) if lex.kind == Token::Eof => Ok(()),
        Some(lex) => Err(ParseError::TrailingTokens { token: lex.text.clone() }),
    }
}

/// Applies the context-sensitive `to` conversion layer.
///
/// `to` is an ordinary word; it becomes the conversion keyword only when
/// the word after it is a known unit, a timezone abbreviation, or one of
/// `unix`, `hex`, `bin`, `oct`, `hms`. Otherwise the expression is
/// returned untouched and `to` is left for the caller to reject (or to
/// have already been consumed as a variable).
pub fn parse_conversion<'a, I>(tokens: &mut Peekable<I>, expr: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let is_to = matches!(tokens.peek(), Some(lex) if lex.kind == Token::Word && lex.text == "to");
    if !is_to {
        return Ok(expr);
    }

    let mut lookahead = tokens.clone();
    lookahead.next();
    let next_word = match lookahead.peek() {
        Some(lex) if lex.kind == Token::Word => lex.text.as_str(),
        _ => return Ok(expr),
    };

    let target = if let Some(zone) = lookup_timezone(next_word) {
        tokens.next();
        tokens.next();
        ConvTarget::Zone(zone)
    } else {
        match next_word {
            "unix" => {
                tokens.next();
                tokens.next();
                ConvTarget::Unix
            },
            "hex" => {
                tokens.next();
                tokens.next();
                ConvTarget::Hex
            },
            "bin" => {
                tokens.next();
                tokens.next();
                ConvTarget::Bin
            },
            "oct" => {
                tokens.next();
                tokens.next();
                ConvTarget::Oct
            },
            "hms" => {
                tokens.next();
                tokens.next();
                ConvTarget::Hms
            },
            _ => {
                if lookup_unit(next_word).is_none() {
                    return Ok(expr);
                }
                tokens.next();
                ConvTarget::Unit(parse_compound_unit_spec(tokens)?)
            },
        }
    };

    Ok(Expr::Convert { expr: Box::new(expr),
                       target })
}

/// Parses a compound unit spec: `UNIT ('/' UNIT)?`.
///
/// # Errors
/// - [`ParseError::ExpectedUnit`] when a unit name is missing.
/// - [`ParseError::UnknownUnit`] when a word is not in the catalogue.
pub fn parse_compound_unit_spec<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<CompoundUnit>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let num = match tokens.peek() {
        Some(lex) if lex.kind == Token::Word => {
            let unit = lookup_unit(&lex.text).ok_or_else(|| {
                                                 ParseError::UnknownUnit { name:
                                                                               lex.text.clone(), }
                                             })?;
            tokens.next();
            unit
        },
        _ => return Err(ParseError::ExpectedUnit { after: "to" }),
    };

    let mut compound = CompoundUnit { num,
                                      den: number_unit() };

    if matches!(tokens.peek(), Some(lex) if lex.kind == Token::Slash) {
        tokens.next();
        match tokens.peek() {
            Some(lex) if lex.kind == Token::Word => {
                let unit = lookup_unit(&lex.text).ok_or_else(|| {
                                                     ParseError::UnknownUnit { name: lex.text
                                                                                        .clone(), }
                                                 })?;
                tokens.next();
                compound.den = unit;
            },
            _ => return Err(ParseError::ExpectedUnit { after: "/" }),
        }
    }

    Ok(compound)
}
