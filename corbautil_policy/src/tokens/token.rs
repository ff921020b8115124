//! Policy-list token types
//!
//! The lexer produces a flat sequence of these. There are no keywords: policy
//! names, parameter names and parameter values are all identifiers, and the
//! parser decides what each one means by position.
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spelling used for the end-of-stream token
pub const END_OF_POLICY_LIST: &str = "<end-of-policy-list>";

/// Token categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Bare identifier, number, or quoted literal
    Ident,
    /// `=`
    Equals,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `,` inside a parameter list
    Comma,
    /// End of input, repeated on every later request
    EndOfStream,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Ident => "t_ident",
            TokenKind::Equals => "t_equals",
            TokenKind::OpenParen => "t_open_p",
            TokenKind::CloseParen => "t_close_p",
            TokenKind::Comma => "t_comma",
            TokenKind::EndOfStream => "t_EOS",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token together with its spelling and location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw text of the token; for quoted literals, the content between quotes
    pub spelling: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, spelling: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            span,
        }
    }

    pub fn end_of_stream(span: Span) -> Self {
        Self::new(TokenKind::EndOfStream, END_OF_POLICY_LIST, span)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::EndOfStream
    }

    /// Render the token back into policy-list syntax.
    ///
    /// Identifiers whose spelling would not lex as a bare identifier are
    /// re-quoted so that the output parses to the same token.
    pub fn as_policy_text(&self) -> String {
        match self.kind {
            TokenKind::Ident => {
                if !self.spelling.is_empty() && self.spelling.chars().all(is_ident_char) {
                    self.spelling.clone()
                } else {
                    format!("'{}'", self.spelling)
                }
            }
            TokenKind::EndOfStream => String::new(),
            _ => self.spelling.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.spelling)
    }
}

/// Characters that may appear in a bare identifier
pub fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | ':' | '.')
}
