//! Syntax analysis of policy lists
//!
//! Turns a policy-list string into clauses and, given a factory, into ORB
//! policy objects.

pub mod clause;
pub mod error;
pub mod parser;

pub use clause::{NameValue, ParsedPolicy};
pub use error::{Expectation, ParseError, ParseResult};
pub use parser::PolicyListParser;

use crate::factory::default_policy_factory;
use crate::orb::{Orb, PolicyHandle};

/// Parse `text` with the process-wide default factory
pub fn parse_policy_list(orb: &dyn Orb, text: &str) -> ParseResult<Vec<PolicyHandle>> {
    PolicyListParser::new().parse_policy_list(text, orb, default_policy_factory())
}

/// Parse `text` into clauses without creating any policy
pub fn parse_clauses(text: &str) -> ParseResult<Vec<ParsedPolicy>> {
    PolicyListParser::new().parse_clauses(text)
}
