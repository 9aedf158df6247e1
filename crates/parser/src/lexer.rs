//! Logos-based lexer for the line-oriented command protocol.
//!
//! A script is a sequence of lines, each holding one command: a keyword
//! followed by whitespace-separated words. Keywords are case-sensitive; a
//! word that merely starts with a keyword (`SETX`) is an ordinary word.
//!
//! # Example input
//!
//! ```text
//! SET a 10
//! BEGIN
//! NUMEQUALTO 10
//! ```

use core::ops::Range;

/// All token kinds produced by the protocol lexer.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(::logos::Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[token("SET")]
    Set,
    #[token("GET")]
    Get,
    #[token("UNSET")]
    Unset,
    #[token("NUMEQUALTO")]
    NumEqualTo,
    #[token("BEGIN")]
    Begin,
    #[token("ROLLBACK")]
    Rollback,
    #[token("COMMIT")]
    Commit,
    #[token("END")]
    End,

    /// Any other run of non-whitespace characters: a name, a value, or an
    /// unknown keyword.
    #[regex(r"\S+")]
    Word,

    /// Any run of Unicode whitespace other than a line feed.
    #[regex(r"[^\S\n]+")]
    Whitespace,

    /// A line feed.
    #[token("\n")]
    Newline,
}

impl TokenKind {
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        !matches!(self, Self::Word | Self::Whitespace | Self::Newline)
    }
}

/// A single token with its kind and the byte-offset span in the source.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range `start..end` into the original input string.
    pub span: Range<usize>,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }

    /// Return the source text for this token given the original input.
    #[must_use]
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.span.clone()]
    }
}

/// Tokenize `input` and return all valid tokens.
///
/// Every byte of valid UTF-8 input belongs to some token, so nothing is
/// skipped in practice.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    use logos::Logos as _;
    TokenKind::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|kind| Token { kind, span }))
        .collect()
}

/// Tokenize `input` and return tokens paired with their source text slices.
#[must_use]
pub fn tokenize_with_text(input: &str) -> Vec<(Token, &str)> {
    use logos::Logos as _;
    TokenKind::lexer(input)
        .spanned()
        .filter_map(|(result, span)| {
            result.ok().map(|kind| {
                let text = &input[span.clone()];
                (Token { kind, span }, text)
            })
        })
        .collect()
}
