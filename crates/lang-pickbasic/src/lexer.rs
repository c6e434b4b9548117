//! Logos-based tokenizer for Pick BASIC source.
//!
//! Horizontal whitespace is skipped; line breaks are kept because they end
//! statements. Comments are not recognised here: `*`, `!` and `REM` only
//! open a comment at the start of a statement, which the parser decides.

use logos::Logos;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Newline,
    Ident,
    Number,
    String,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Power,
    Colon,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Hash,
    Amp,
    Bang,
    At,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    ColonEq,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    /// Bytes no token matches, e.g. an unterminated string.
    Error,
    Eof,
}

impl TokenKind {
    /// Statement terminators.
    pub fn ends_statement(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof)
    }

    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::ColonEq
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range<usize>,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\f]+")]
enum LogosToken {
    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"[A-Za-z][A-Za-z0-9._$%]*")]
    #[regex(r"@[A-Za-z][A-Za-z0-9._$%]*")]
    Ident,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    #[regex(r"\.[0-9]+")]
    Number,

    #[regex(r#""[^"\r\n]*""#)]
    #[regex(r"'[^'\r\n]*'")]
    #[regex(r"\\[^\\\r\n]*\\")]
    String,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("**")]
    Power,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token("<>")]
    #[token("><")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    #[token("=<")]
    LtEq,
    #[token(">=")]
    #[token("=>")]
    GtEq,
    #[token("#")]
    Hash,
    #[token("&")]
    Amp,
    #[token("!")]
    Bang,
    #[token("@")]
    At,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token(":=")]
    ColonEq,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Newline => TokenKind::Newline,
            LogosToken::Ident => TokenKind::Ident,
            LogosToken::Number => TokenKind::Number,
            LogosToken::String => TokenKind::String,
            LogosToken::Plus => TokenKind::Plus,
            LogosToken::Minus => TokenKind::Minus,
            LogosToken::Star => TokenKind::Star,
            LogosToken::Slash => TokenKind::Slash,
            LogosToken::Caret => TokenKind::Caret,
            LogosToken::Power => TokenKind::Power,
            LogosToken::Colon => TokenKind::Colon,
            LogosToken::Eq => TokenKind::Eq,
            LogosToken::NotEq => TokenKind::NotEq,
            LogosToken::Lt => TokenKind::Lt,
            LogosToken::Gt => TokenKind::Gt,
            LogosToken::LtEq => TokenKind::LtEq,
            LogosToken::GtEq => TokenKind::GtEq,
            LogosToken::Hash => TokenKind::Hash,
            LogosToken::Amp => TokenKind::Amp,
            LogosToken::Bang => TokenKind::Bang,
            LogosToken::At => TokenKind::At,
            LogosToken::PlusEq => TokenKind::PlusEq,
            LogosToken::MinusEq => TokenKind::MinusEq,
            LogosToken::StarEq => TokenKind::StarEq,
            LogosToken::SlashEq => TokenKind::SlashEq,
            LogosToken::ColonEq => TokenKind::ColonEq,
            LogosToken::LParen => TokenKind::LParen,
            LogosToken::RParen => TokenKind::RParen,
            LogosToken::LBracket => TokenKind::LBracket,
            LogosToken::RBracket => TokenKind::RBracket,
            LogosToken::Comma => TokenKind::Comma,
            LogosToken::Semicolon => TokenKind::Semicolon,
        }
    }
}

/// Tokenizes the whole source. Never fails; unmatched bytes become
/// [`TokenKind::Error`] tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = LogosToken::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let kind = match result {
            Ok(token) => token.into(),
            Err(()) => TokenKind::Error,
        };
        tokens.push(Token {
            kind,
            range: lexer.span(),
        });
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn dotted_identifiers_are_single_tokens() {
        let tokens = tokenize("CALL EXTERNAL.SUB(X)");
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].range, 5..17);
    }

    #[test]
    fn all_three_string_delimiters() {
        assert_eq!(
            kinds(r#"X = "A" : 'B' : \C\"#),
            vec![
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::String,
                TokenKind::Colon,
                TokenKind::String,
                TokenKind::Colon,
                TokenKind::String,
            ]
        );
    }

    #[test]
    fn compound_operators_win_over_prefixes() {
        assert_eq!(
            kinds("A += 1 <> 2 ** 3"),
            vec![
                TokenKind::Ident,
                TokenKind::PlusEq,
                TokenKind::Number,
                TokenKind::NotEq,
                TokenKind::Number,
                TokenKind::Power,
                TokenKind::Number,
            ]
        );
    }

    #[test]
    fn line_breaks_are_kept() {
        assert_eq!(
            kinds("X = 1\r\nY = 2\n"),
            vec![
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::Number,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        let tokens = tokenize("Y = \"OOPS\n");
        assert_eq!(tokens[2].kind, TokenKind::Error);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Newline));
    }
}
