//! Shared primitive types used by the lexer, the parser and the logging layer.

pub mod span;

pub use span::{Position, Span};
