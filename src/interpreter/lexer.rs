use logos::Logos;

/// The kind of a lexeme produced by [`lex`].
///
/// This is the closed token set of the language. `Eof` terminates every
/// token sequence; it is appended by `lex` rather than matched from the
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A numeric literal: decimal digits or a `0x`/`0b`/`0o` prefixed
    /// integer. Decimal points and fraction slashes are separate tokens;
    /// the parser re-associates them using byte positions.
    Number,
    /// A time-of-day literal such as `14:30` or `9:05:30`. Only emitted
    /// when the hour part is one or two digits and the minutes are exactly
    /// two; otherwise the colon is skipped as an unknown character.
    Time,
    /// An `@`-prefixed date, date-time, date-time-with-offset, time, or
    /// unix-seconds literal, matched greedily as a single token.
    AtLiteral,
    /// An identifier: unit names, variable names, function names, `to`,
    /// timezone abbreviations, `AM`/`PM`.
    Word,
    /// A currency symbol: `$`, `€`, `£`, or `¥`.
    Currency,
    /// `**`
    StarStar,
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `/`
    Slash,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `!`
    Bang,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `=`
    Equals,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `#`
    Hash,
    /// `%`
    Percent,
    /// End of the token sequence.
    Eof,
}

/// The logos-derived matcher behind [`lex`].
///
/// Kept separate from [`Token`] so the public kind can carry the `Eof`
/// terminator, which is never matched from input. Anything this enum does
/// not match (single `<` or `>`, stray `:` or `@`, other bytes) is
/// silently skipped.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"0[bB][01]+")]
    #[regex(r"0[oO][0-7]+")]
    #[regex(r"[0-9]+")]
    Number,
    #[regex(r"[0-9][0-9]?:[0-9][0-9](:[0-9][0-9])?")]
    Time,
    #[regex(r"@[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}([T ][0-9]{1,2}:[0-9]{2}:[0-9]{2}( [\+\-][0-9]{4})?)?")]
    #[regex(r"@[0-9]{1,2}:[0-9]{2}(:[0-9]{2})?")]
    #[regex(r"@[0-9]+")]
    AtLiteral,
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Word,
    #[token("$")]
    #[token("€")]
    #[token("£")]
    #[token("¥")]
    Currency,
    #[token("**")]
    StarStar,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("/")]
    Slash,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("=")]
    Equals,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("#")]
    Hash,
    #[token("%")]
    Percent,
}

impl RawToken {
    const fn kind(self) -> Token {
        match self {
            Self::Number => Token::Number,
            Self::Time => Token::Time,
            Self::AtLiteral => Token::AtLiteral,
            Self::Word => Token::Word,
            Self::Currency => Token::Currency,
            Self::StarStar => Token::StarStar,
            Self::Star => Token::Star,
            Self::Plus => Token::Plus,
            Self::Minus => Token::Minus,
            Self::Slash => Token::Slash,
            Self::Amp => Token::Amp,
            Self::Pipe => Token::Pipe,
            Self::Caret => Token::Caret,
            Self::Tilde => Token::Tilde,
            Self::Bang => Token::Bang,
            Self::Shl => Token::Shl,
            Self::Shr => Token::Shr,
            Self::LParen => Token::LParen,
            Self::RParen => Token::RParen,
            Self::Equals => Token::Equals,
            Self::Dot => Token::Dot,
            Self::Comma => Token::Comma,
            Self::Hash => Token::Hash,
            Self::Percent => Token::Percent,
        }
    }
}

/// A single token with its literal text and byte offset in the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// Token kind.
    pub kind: Token,
    /// The matched text; retains the leading `@` for `@`-literals, empty
    /// for `Eof`.
    pub text: String,
    /// Byte offset of the first matched byte in the input line.
    pub pos:  usize,
}

/// Tokenizes a single line.
///
/// Whitespace separates tokens and unknown characters are skipped without
/// error. The returned sequence always ends with an `Eof` lexeme whose
/// position is the line length.
///
/// # Example
/// ```
/// use ratcalc::interpreter::lexer::{Token, lex};
///
/// let tokens = lex("5 m + 3:30");
/// let kinds: Vec<Token> = tokens.iter().map(|l| l.kind).collect();
/// assert_eq!(kinds,
///            vec![Token::Number, Token::Word, Token::Plus, Token::Time, Token::Eof]);
/// assert_eq!(tokens[3].text, "3:30");
/// assert_eq!(tokens[3].pos, 6);
/// ```
#[must_use]
pub fn lex(line: &str) -> Vec<Lexeme> {
    let mut lexer = RawToken::lexer(line);
    let mut lexemes = Vec::new();
    while let Some(result) = lexer.next() {
        if let Ok(raw) = result {
            lexemes.push(Lexeme { kind: raw.kind(),
                                  text: lexer.slice().to_string(),
                                  pos:  lexer.span().start, });
        }
        // Unmatched input is skipped, matching the language's tolerance
        // for stray characters.
    }
    lexemes.push(Lexeme { kind: Token::Eof,
                          text: String::new(),
                          pos:  line.len(), });
    lexemes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<Token> {
        lex(line).into_iter().map(|l| l.kind).collect()
    }

    #[test]
    fn doubled_operators_take_priority() {
        assert_eq!(kinds("2 ** 3 * 4"),
                   vec![Token::Number,
                        Token::StarStar,
                        Token::Number,
                        Token::Star,
                        Token::Number,
                        Token::Eof]);
        assert_eq!(kinds("1 << 2 >> 3"),
                   vec![Token::Number,
                        Token::Shl,
                        Token::Number,
                        Token::Shr,
                        Token::Number,
                        Token::Eof]);
    }

    #[test]
    fn single_angle_brackets_are_skipped() {
        assert_eq!(kinds("1 < 2"), vec![Token::Number, Token::Number, Token::Eof]);
    }

    #[test]
    fn prefixed_integers_lex_as_one_number() {
        let tokens = lex("0xFF 0b1010 0o77");
        assert_eq!(tokens[0].text, "0xFF");
        assert_eq!(tokens[1].text, "0b1010");
        assert_eq!(tokens[2].text, "0o77");
    }

    #[test]
    fn time_requires_two_minute_digits() {
        // `14:3` is not a time literal: the number, a skipped colon, and
        // another number remain.
        assert_eq!(kinds("14:3"), vec![Token::Number, Token::Number, Token::Eof]);
        assert_eq!(kinds("14:30"), vec![Token::Time, Token::Eof]);
        assert_eq!(kinds("9:05:30"), vec![Token::Time, Token::Eof]);
    }

    #[test]
    fn three_digit_hours_are_not_times() {
        assert_eq!(kinds("123:45"),
                   vec![Token::Number, Token::Number, Token::Eof]);
    }

    #[test]
    fn at_literals_match_greedily() {
        let tokens = lex("@2024-01-31 10:30:00 +0530");
        assert_eq!(tokens[0].kind, Token::AtLiteral);
        assert_eq!(tokens[0].text, "@2024-01-31 10:30:00 +0530");

        let tokens = lex("@2024-1-5");
        assert_eq!(tokens[0].text, "@2024-1-5");

        let tokens = lex("@14:30:05");
        assert_eq!(tokens[0].text, "@14:30:05");

        let tokens = lex("@1706745600");
        assert_eq!(tokens[0].text, "@1706745600");
    }

    #[test]
    fn currency_symbols_including_multibyte() {
        let tokens = lex("$5 + €3 + £2 + ¥1");
        let syms: Vec<&str> = tokens.iter()
                                    .filter(|l| l.kind == Token::Currency)
                                    .map(|l| l.text.as_str())
                                    .collect();
        assert_eq!(syms, vec!["$", "€", "£", "¥"]);
    }

    #[test]
    fn positions_are_byte_offsets() {
        let tokens = lex("1/3");
        assert_eq!(tokens[0].pos, 0);
        assert_eq!(tokens[1].pos, 1);
        assert_eq!(tokens[2].pos, 2);
    }
}
