//! Policy-list parse errors
//!
//! Every message carries the full policy-list text so a caller can report it
//! without further context.

use crate::factory::PolicyError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::utils::Span;
use std::fmt;

pub type ParseResult<T> = Result<T, ParseError>;

/// What the parser wanted when it found something else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    CommaOrCloseParen,
    ParameterNameOrValue,
    ParameterValue,
    EndOfList,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Expectation::CommaOrCloseParen => "Expecting \",\" or \")\"",
            Expectation::ParameterNameOrValue => "Expecting a parameter name, value or \")\"",
            Expectation::ParameterValue => "Expecting a parameter value",
            Expectation::EndOfList => "unexpected end of policy list",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("error parsing policy list '{text}': {source}")]
    Lexical {
        text: String,
        #[source]
        source: LexerError,
    },

    #[error("error parsing policy list '{text}' near '{near}': {expected}")]
    UnexpectedToken {
        text: String,
        near: String,
        expected: Expectation,
        span: Span,
    },

    #[error("error parsing policy list '{text}': more than {limit} policies")]
    TooManyPolicies { text: String, limit: usize },

    #[error("error parsing policy list '{text}': policy '{policy}' has more than {limit} parameters")]
    TooManyParameters {
        text: String,
        policy: String,
        limit: usize,
    },

    #[error("error creating policy '{name}' in '{text}': {source}")]
    PolicyCreation {
        name: String,
        text: String,
        #[source]
        source: PolicyError,
    },
}

impl ParseError {
    pub fn error_code(&self) -> Code {
        match self {
            ParseError::Lexical { source, .. } => source.error_code(),
            ParseError::UnexpectedToken {
                expected: Expectation::EndOfList,
                ..
            } => codes::syntax::TRAILING_INPUT,
            ParseError::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            ParseError::TooManyPolicies { .. } => codes::syntax::TOO_MANY_POLICIES,
            ParseError::TooManyParameters { .. } => codes::syntax::TOO_MANY_PARAMETERS,
            ParseError::PolicyCreation { .. } => codes::syntax::POLICY_CREATION_FAILED,
        }
    }

    /// The policy-list text being parsed
    pub fn text(&self) -> &str {
        match self {
            ParseError::Lexical { text, .. }
            | ParseError::UnexpectedToken { text, .. }
            | ParseError::TooManyPolicies { text, .. }
            | ParseError::TooManyParameters { text, .. }
            | ParseError::PolicyCreation { text, .. } => text,
        }
    }

    /// Location of the offending token, for grammar errors
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnexpectedToken { span, .. } => Some(*span),
            _ => None,
        }
    }

    /// The factory error, when a policy could not be created
    pub fn policy_error(&self) -> Option<&PolicyError> {
        match self {
            ParseError::PolicyCreation { source, .. } => Some(source),
            _ => None,
        }
    }
}
