//! Recursive-descent policy-list parser
//!
//! ```text
//! PolicyList := Policy* EndOfStream
//! Policy     := Ident [ '(' [ Param (',' Param)* ] ')' ]
//! Param      := Ident [ '=' Ident ]
//! ```
//!
//! The parser keeps one token of lookahead. A clause is handed to the caller
//! once it is complete and the token after it has been lexed, so a lexical
//! error right after a clause wins over any factory error for that clause.

use crate::config::compile_time::syntax::*;
use crate::config::runtime::policy_preferences;
use crate::factory::PolicyFactory;
use crate::lexical::{LexerError, LexicalAnalyzer};
use crate::logging::codes;
use crate::orb::{Orb, PolicyHandle};
use crate::syntax::clause::{NameValue, ParsedPolicy};
use crate::syntax::error::{Expectation, ParseError, ParseResult};
use crate::tokens::{Token, TokenKind};
use crate::utils::Span;
use crate::{log_debug, log_error, log_success};

/// Reusable parser; each call resets the lexer
#[derive(Debug)]
pub struct PolicyListParser {
    lexer: LexicalAnalyzer,
    text: String,
    current: Token,
}

impl PolicyListParser {
    pub fn new() -> Self {
        Self {
            lexer: LexicalAnalyzer::new(),
            text: String::new(),
            current: Token::end_of_stream(Span::default()),
        }
    }

    /// Parse `text`, calling `on_policy` for each clause in order.
    ///
    /// Returns the number of clauses. The first error from the grammar or
    /// from `on_policy` aborts the parse.
    pub fn parse_with<F>(&mut self, text: &str, mut on_policy: F) -> ParseResult<usize>
    where
        F: FnMut(ParsedPolicy) -> ParseResult<()>,
    {
        self.text.clear();
        self.text.push_str(text);
        self.lexer.reset(text).map_err(|source| self.lexical(source))?;
        self.advance()?;

        let mut count = 0;
        while self.current.is(TokenKind::Ident) {
            if count == MAX_POLICIES_PER_LIST {
                return Err(ParseError::TooManyPolicies {
                    text: self.text.clone(),
                    limit: MAX_POLICIES_PER_LIST,
                });
            }
            let clause = self.policy()?;
            on_policy(clause)?;
            count += 1;
        }

        self.accept(TokenKind::EndOfStream, Expectation::EndOfList)?;
        Ok(count)
    }

    /// Parse `text` into clauses without creating any policy
    pub fn parse_clauses(&mut self, text: &str) -> ParseResult<Vec<ParsedPolicy>> {
        let mut clauses = Vec::new();
        let result = self.parse_with(text, |clause| {
            clauses.push(clause);
            Ok(())
        });

        report(text, result.map(|_| clauses))
    }

    /// Parse `text` and create one policy per clause through `factory`
    pub fn parse_policy_list(
        &mut self,
        text: &str,
        orb: &dyn Orb,
        factory: &dyn PolicyFactory,
    ) -> ParseResult<Vec<PolicyHandle>> {
        self.parse_policy_list_with(text, orb, factory, |_| {})
    }

    /// `parse_policy_list`, also showing each clause to `observe` once its
    /// policy exists
    pub fn parse_policy_list_with<F>(
        &mut self,
        text: &str,
        orb: &dyn Orb,
        factory: &dyn PolicyFactory,
        mut observe: F,
    ) -> ParseResult<Vec<PolicyHandle>>
    where
        F: FnMut(&ParsedPolicy),
    {
        let log_created = policy_preferences().log_created_policies;
        let mut policies = Vec::new();

        let result = self.parse_with(text, |clause| {
            let policy = factory
                .create(orb, &clause.name, &clause.parameters)
                .map_err(|source| ParseError::PolicyCreation {
                    name: clause.name.clone(),
                    text: text.to_string(),
                    source,
                })?;

            if log_created {
                log_success!(
                    codes::success::POLICY_CREATED,
                    "Policy created",
                    "policy" => clause,
                    "policy_type" => policy.policy_type()
                );
            }
            observe(&clause);
            policies.push(policy);
            Ok(())
        });

        report(text, result.map(|_| policies))
    }

    fn lexical(&self, source: LexerError) -> ParseError {
        ParseError::Lexical {
            text: self.text.clone(),
            source,
        }
    }

    fn advance(&mut self) -> ParseResult<()> {
        match self.lexer.next_token() {
            Ok(token) => {
                self.current = token;
                Ok(())
            }
            Err(source) => Err(self.lexical(source)),
        }
    }

    /// Consume the current token if it is of `kind`
    fn accept(&mut self, kind: TokenKind, expected: Expectation) -> ParseResult<Token> {
        if !self.current.is(kind) {
            return Err(ParseError::UnexpectedToken {
                text: self.text.clone(),
                near: self.current.spelling.clone(),
                expected,
                span: self.current.span,
            });
        }

        let token = self.current.clone();
        self.advance()?;
        Ok(token)
    }

    fn policy(&mut self) -> ParseResult<ParsedPolicy> {
        let name = self.accept(TokenKind::Ident, Expectation::EndOfList)?;
        let mut span = name.span;
        let mut parameters = Vec::new();

        if self.current.is(TokenKind::OpenParen) {
            self.advance()?;
            if !self.current.is(TokenKind::CloseParen) {
                parameters.push(self.parameter()?);
                while self.current.is(TokenKind::Comma) {
                    self.advance()?;
                    if parameters.len() == MAX_PARAMETERS_PER_POLICY {
                        return Err(ParseError::TooManyParameters {
                            text: self.text.clone(),
                            policy: name.spelling,
                            limit: MAX_PARAMETERS_PER_POLICY,
                        });
                    }
                    parameters.push(self.parameter()?);
                }
            }
            let close = self.accept(TokenKind::CloseParen, Expectation::CommaOrCloseParen)?;
            span = span.merge(close.span);
        }

        log_debug!("Parsed policy clause",
            "name" => name.spelling,
            "parameters" => parameters.len()
        );

        Ok(ParsedPolicy {
            name: name.spelling,
            parameters,
            span,
        })
    }

    fn parameter(&mut self) -> ParseResult<NameValue> {
        let first = self.accept(TokenKind::Ident, Expectation::ParameterNameOrValue)?;
        if !self.current.is(TokenKind::Equals) {
            return Ok(NameValue::positional(first.spelling));
        }

        self.advance()?;
        let value = self.accept(TokenKind::Ident, Expectation::ParameterValue)?;
        Ok(NameValue::named(first.spelling, value.spelling))
    }
}

impl Default for PolicyListParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Log the outcome of one parse. Lexical errors were already logged by the
/// analyzer.
fn report<T>(text: &str, result: ParseResult<Vec<T>>) -> ParseResult<Vec<T>> {
    match &result {
        Ok(items) => {
            log_success!(
                codes::success::POLICY_LIST_PARSED,
                "Policy list parsed",
                "policies" => items.len(),
                "text" => text
            );
        }
        Err(ParseError::Lexical { .. }) => {}
        Err(error) => {
            let message = error.to_string();
            match error.span() {
                Some(span) => log_error!(error.error_code(), &message, span = span),
                None => log_error!(error.error_code(), &message),
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{ExtendablePolicyFactory, PolicyError};
    use crate::orb::memory::InMemoryOrb;
    use crate::orb::{policy_type, PolicyValue};
    use assert_matches::assert_matches;
    use std::sync::{Arc, Mutex};

    fn clauses(text: &str) -> ParseResult<Vec<ParsedPolicy>> {
        PolicyListParser::new().parse_clauses(text)
    }

    fn error_message(text: &str) -> String {
        clauses(text).unwrap_err().to_string()
    }

    #[test]
    fn test_empty_list() {
        assert!(clauses("").unwrap().is_empty());
        assert!(clauses("  , + ").unwrap().is_empty());
    }

    #[test]
    fn test_two_predefined_policies_in_order() {
        let orb = InMemoryOrb::new();
        let factory = ExtendablePolicyFactory::new();
        let policies = PolicyListParser::new()
            .parse_policy_list("persistent, user_id", &orb, &factory)
            .unwrap();

        assert_eq!(policies.len(), 2);
        assert_eq!(policies[0].policy_type(), policy_type::LIFESPAN);
        assert_eq!(policies[1].policy_type(), policy_type::ID_ASSIGNMENT);
        assert_eq!(policies[1].value(), PolicyValue::Enumerant(0));
    }

    #[test]
    fn test_observer_sees_each_created_clause() {
        let orb = InMemoryOrb::new();
        let factory = ExtendablePolicyFactory::new();
        let mut names = Vec::new();
        let policies = PolicyListParser::new()
            .parse_policy_list_with("user_id persistent", &orb, &factory, |clause| {
                names.push(clause.name.clone())
            })
            .unwrap();

        assert_eq!(policies.len(), 2);
        assert_eq!(names, vec!["user_id".to_string(), "persistent".to_string()]);
    }

    #[test]
    fn test_mixed_parameters() {
        let orb = InMemoryOrb::new();
        let factory = ExtendablePolicyFactory::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();
        factory
            .register_policy_factory(
                "foo",
                move |orb: &dyn Orb,
                      _name: &str,
                      params: &[NameValue]|
                      -> Result<PolicyHandle, PolicyError> {
                    record.lock().unwrap().push(params.to_vec());
                    Ok(orb.create_policy(0x1000, PolicyValue::Bool(true))?)
                },
            )
            .unwrap();

        let policies = PolicyListParser::new()
            .parse_policy_list("foo(bar=1, 'baz')", &orb, &factory)
            .unwrap();

        assert_eq!(policies.len(), 1);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            vec![NameValue::named("bar", "1"), NameValue::positional("baz")]
        );
    }

    #[test]
    fn test_parameters_on_predefined_policy() {
        let orb = InMemoryOrb::new();
        let factory = ExtendablePolicyFactory::new();
        let error = PolicyListParser::new()
            .parse_policy_list("persistent(x)", &orb, &factory)
            .unwrap_err();

        assert_matches!(
            error.policy_error(),
            Some(PolicyError::UnexpectedParameters { .. })
        );
        assert_eq!(
            error.to_string(),
            "error creating policy 'persistent' in 'persistent(x)': \
             policy 'persistent' does not take any parameters"
        );
    }

    #[test]
    fn test_unknown_policy_stops_parse() {
        let orb = InMemoryOrb::new();
        let factory = ExtendablePolicyFactory::new();
        let error = PolicyListParser::new()
            .parse_policy_list("transient bogus retain", &orb, &factory)
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "error creating policy 'bogus' in 'transient bogus retain': illegal policy name"
        );
        // the clause before the failure already produced a policy
        assert_eq!(orb.created_policy_count(), 1);
    }

    #[test]
    fn test_clause_shapes() {
        let parsed = clauses("a b() c(x) d(k=v, w) 'e f'").unwrap();
        let names: Vec<_> = parsed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e f"]);
        assert!(parsed[1].parameters.is_empty());
        assert_eq!(parsed[2].parameters, vec![NameValue::positional("x")]);
        assert_eq!(parsed[3].names(), vec!["k", ""]);
        assert_eq!(parsed[3].values(), vec!["v", "w"]);
    }

    #[test]
    fn test_clause_spans() {
        let parsed = clauses("ab cd(x)").unwrap();
        assert_eq!(parsed[0].span.start().offset, 0);
        assert_eq!(parsed[0].span.end().offset, 2);
        assert_eq!(parsed[1].span.start().offset, 3);
        assert_eq!(parsed[1].span.end().offset, 8);
    }

    #[test]
    fn test_grammar_error_messages() {
        assert_eq!(
            error_message("foo(a b)"),
            r#"error parsing policy list 'foo(a b)' near 'b': Expecting "," or ")""#
        );
        assert_eq!(
            error_message("foo(a,)"),
            r#"error parsing policy list 'foo(a,)' near ')': Expecting a parameter name, value or ")""#
        );
        assert_eq!(
            error_message("foo(a=)"),
            "error parsing policy list 'foo(a=)' near ')': Expecting a parameter value"
        );
        assert_eq!(
            error_message("foo = bar"),
            "error parsing policy list 'foo = bar' near '=': unexpected end of policy list"
        );
        assert_eq!(
            error_message("foo("),
            r#"error parsing policy list 'foo(' near '<end-of-policy-list>': Expecting a parameter name, value or ")""#
        );
    }

    #[test]
    fn test_lexical_error_is_wrapped() {
        let error = clauses("foo(a(b))").unwrap_err();
        assert_matches!(
            error,
            ParseError::Lexical {
                source: LexerError::UnexpectedOpenParen { offset: 5 },
                ..
            }
        );
        assert_eq!(
            error.to_string(),
            "error parsing policy list 'foo(a(b))': Unexpected '(' inside a parameter list at offset 5"
        );
    }

    #[test]
    fn test_lexical_error_before_factory_call() {
        let orb = InMemoryOrb::new();
        let factory = ExtendablePolicyFactory::new();
        let error = PolicyListParser::new()
            .parse_policy_list("bogus )", &orb, &factory)
            .unwrap_err();

        assert_matches!(error, ParseError::Lexical { .. });
    }

    #[test]
    fn test_parser_is_reusable() {
        let mut parser = PolicyListParser::new();
        assert!(parser.parse_clauses("foo(").is_err());
        let parsed = parser.parse_clauses("bar(x)").unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "bar");
    }

    #[test]
    fn test_policy_limit() {
        let text = vec!["p"; MAX_POLICIES_PER_LIST + 1].join(" ");
        assert_matches!(clauses(&text), Err(ParseError::TooManyPolicies { .. }));

        let text = vec!["p"; MAX_POLICIES_PER_LIST].join(" ");
        assert_eq!(clauses(&text).unwrap().len(), MAX_POLICIES_PER_LIST);
    }

    #[test]
    fn test_parameter_limit() {
        let params = vec!["x"; MAX_PARAMETERS_PER_POLICY + 1].join(",");
        let text = format!("p({})", params);
        assert_matches!(
            clauses(&text),
            Err(ParseError::TooManyParameters { ref policy, .. }) if policy == "p"
        );
    }
}
