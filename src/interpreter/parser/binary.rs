use std::iter::Peekable;

use crate::{
    ast::{BinaryOp, Expr},
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses a full expression.
///
/// Entry point of the precedence chain. Bitwise OR binds loosest, then
/// XOR, AND, shifts, addition/subtraction, and finally
/// multiplication/division; unary operators and exponentiation live
/// below that in [`parse_unary`].
///
/// Grammar: `expression := bit_or`
///
/// # Parameters
/// - `tokens`: Peekable lexeme iterator positioned at the expression.
///
/// # Returns
/// The parsed expression tree.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_bit_or(tokens)
}

/// Maps a token to its binary operator, if it is one.
#[must_use]
pub const fn token_to_binary_op(token: Token) -> Option<BinaryOp> {
    match token {
        Token::Plus => Some(BinaryOp::Add),
        Token::Minus => Some(BinaryOp::Sub),
        Token::Star => Some(BinaryOp::Mul),
        Token::Slash => Some(BinaryOp::Div),
        Token::StarStar => Some(BinaryOp::Pow),
        Token::Amp => Some(BinaryOp::BitAnd),
        Token::Pipe => Some(BinaryOp::BitOr),
        Token::Caret => Some(BinaryOp::BitXor),
        Token::Shl => Some(BinaryOp::Shl),
        Token::Shr => Some(BinaryOp::Shr),
        _ => None,
    }
}

/// Builds one left-associative precedence level: `next (op next)*` for
/// every operator the filter accepts.
fn parse_level<'a, I>(tokens: &mut Peekable<I>,
                      accepts: fn(BinaryOp) -> bool,
                      next: fn(&mut Peekable<I>) -> ParseResult<Expr>)
                      -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut left = next(tokens)?;
    loop {
        if let Some(lex) = tokens.peek()
           && let Some(op) = token_to_binary_op(lex.kind)
           && accepts(op)
        {
            tokens.next();
            let right = next(tokens)?;
            left = Expr::Binary { op,
                                  left: Box::new(left),
                                  right: Box::new(right) };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Grammar: `bit_or := bit_xor ('|' bit_xor)*`
pub fn parse_bit_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_level(tokens, |op| matches!(op, BinaryOp::BitOr), parse_bit_xor)
}

/// Grammar: `bit_xor := bit_and ('^' bit_and)*`
pub fn parse_bit_xor<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_level(tokens, |op| matches!(op, BinaryOp::BitXor), parse_bit_and)
}

/// Grammar: `bit_and := shift ('&' shift)*`
pub fn parse_bit_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_level(tokens, |op| matches!(op, BinaryOp::BitAnd), parse_shift)
}

/// Grammar: `shift := addsub (('<<' | '>>') addsub)*`
pub fn parse_shift<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_level(tokens,
                |op| matches!(op, BinaryOp::Shl | BinaryOp::Shr),
                parse_additive)
}

/// Grammar: `addsub := muldiv (('+' | '-') muldiv)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_level(tokens,
                |op| matches!(op, BinaryOp::Add | BinaryOp::Sub),
                parse_multiplicative)
}

/// Grammar: `muldiv := unary (('*' | '/') unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_level(tokens,
                |op| matches!(op, BinaryOp::Mul | BinaryOp::Div),
                parse_unary)
}
