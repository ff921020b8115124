//! Parsed policy clauses

use crate::utils::Span;
use serde::Serialize;
use std::fmt;

/// One policy parameter
///
/// A bare value has an empty `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            value: value.into(),
        }
    }

    pub fn is_positional(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for NameValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_positional() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{}={}", self.name, self.value)
        }
    }
}

/// A policy name with its parameters, before any factory has seen it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPolicy {
    pub name: String,
    pub parameters: Vec<NameValue>,
    pub span: Span,
}

impl ParsedPolicy {
    /// Names of the parameters, index-aligned with [`ParsedPolicy::values`]
    pub fn names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn values(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.value.as_str()).collect()
    }
}

impl fmt::Display for ParsedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.parameters.is_empty() {
            let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
            write!(f, "({})", params.join(", "))?;
        }
        Ok(())
    }
}
