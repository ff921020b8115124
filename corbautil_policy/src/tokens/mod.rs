//! Token system for policy-list lexical analysis
//!
//! A policy list such as `persistent, user_id, my_policy(timeout=30, 'retry')`
//! is reduced to six token kinds:
//!
//! - identifiers (names, numbers and quoted literals)
//! - `=`, `(`, `)`
//! - `,` (only inside parameter lists; elsewhere it is a separator)
//! - end of stream, which the lexer keeps returning once reached
//!
//! All tokens carry span information for error reporting.

pub mod token;

pub use token::{is_ident_char, Token, TokenKind, END_OF_POLICY_LIST};

pub use crate::utils::{Position, Span};
