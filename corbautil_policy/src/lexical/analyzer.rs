//! Policy-list lexical analyzer
//!
//! Whitespace and `+` are separators everywhere. A `,` is a separator between
//! policies and a token between parameters, so the analyzer tracks whether it
//! is inside a parameter list. Parameter lists do not nest.

use crate::config::compile_time::lexical::*;
use crate::logging::codes;
use crate::tokens::{is_ident_char, Token, TokenKind};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error};

/// Lexical analysis errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Unterminated string literal in policy list at offset {offset}: {fragment}")]
    UnterminatedString { offset: usize, fragment: String },

    #[error("Unexpected '(' inside a parameter list at offset {offset}")]
    UnexpectedOpenParen { offset: usize },

    #[error("Unexpected ')' outside a parameter list at offset {offset}")]
    UnexpectedCloseParen { offset: usize },

    #[error("Unexpected character {} in policy list at offset {}", describe_char(*.character), .offset)]
    UnexpectedCharacter { character: char, offset: usize },

    #[error("Policy list too long: {length} bytes (max {MAX_POLICY_LIST_LENGTH})")]
    PolicyListTooLong { length: usize },

    #[error("Identifier too long at offset {offset}: {length} bytes (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, offset: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::UnexpectedOpenParen { .. } => codes::lexical::UNEXPECTED_OPEN_PAREN,
            LexerError::UnexpectedCloseParen { .. } => codes::lexical::UNEXPECTED_CLOSE_PAREN,
            LexerError::UnexpectedCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::PolicyListTooLong { .. } => codes::lexical::POLICY_LIST_TOO_LONG,
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
        }
    }

    /// Byte offset of the offending input
    pub fn offset(&self) -> usize {
        match self {
            LexerError::UnterminatedString { offset, .. }
            | LexerError::UnexpectedOpenParen { offset }
            | LexerError::UnexpectedCloseParen { offset }
            | LexerError::UnexpectedCharacter { offset, .. }
            | LexerError::IdentifierTooLong { offset, .. } => *offset,
            LexerError::PolicyListTooLong { .. } => 0,
        }
    }

    /// The piece of input the error refers to
    pub fn fragment(&self) -> String {
        match self {
            LexerError::UnterminatedString { fragment, .. } => fragment.clone(),
            LexerError::UnexpectedOpenParen { .. } => "(".to_string(),
            LexerError::UnexpectedCloseParen { .. } => ")".to_string(),
            LexerError::UnexpectedCharacter { character, .. } => character.to_string(),
            LexerError::PolicyListTooLong { .. } | LexerError::IdentifierTooLong { .. } => {
                String::new()
            }
        }
    }
}

/// The C locale's `isspace` set, which includes vertical tab
fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

fn describe_char(ch: char) -> String {
    if ch.is_control() {
        format!("({})", ch as u32)
    } else {
        format!("'{}'", ch)
    }
}

/// Streaming lexer over one policy list at a time
#[derive(Debug, Default)]
pub struct LexicalAnalyzer {
    text: String,
    pos: Position,
    in_params: bool,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            pos: Position::start(),
            in_params: false,
        }
    }

    /// Restart tokenizing `text` from offset 0, outside any parameter list
    pub fn reset(&mut self, text: &str) -> Result<(), LexerError> {
        self.text.clear();
        self.pos = Position::start();
        self.in_params = false;

        if text.len() > MAX_POLICY_LIST_LENGTH {
            let error = LexerError::PolicyListTooLong { length: text.len() };
            log_error!(error.error_code(), "Policy list exceeds length limit",
                "length" => text.len(),
                "limit" => MAX_POLICY_LIST_LENGTH
            );
            return Err(error);
        }

        self.text.push_str(text);
        Ok(())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    fn peek_char(&self) -> Option<char> {
        self.text[self.pos.offset..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos = self.pos.advance(ch);
        Some(ch)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        let spelling = match self.bump() {
            Some(ch) => ch.to_string(),
            None => String::new(),
        };
        Token::new(kind, spelling, Span::new(start, self.pos))
    }

    fn fail(&self, error: LexerError, start: Position) -> Result<Token, LexerError> {
        let span = Span::new(start, self.pos.max(start));
        log_error!(error.error_code(), "Lexical error in policy list",
            span = span,
            "offset" => error.offset(),
            "fragment" => error.fragment()
        );
        Err(error)
    }

    /// Advance and return the next token.
    ///
    /// Once the input is exhausted every call returns end-of-stream.
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        while let Some(ch) = self.peek_char() {
            if is_space(ch) || ch == '+' || (ch == ',' && !self.in_params) {
                self.bump();
            } else {
                break;
            }
        }

        let start = self.pos;
        let Some(ch) = self.peek_char() else {
            return Ok(Token::end_of_stream(Span::empty(start)));
        };

        let token = match ch {
            '(' => {
                if self.in_params {
                    return self.fail(LexerError::UnexpectedOpenParen { offset: start.offset }, start);
                }
                self.in_params = true;
                self.single(TokenKind::OpenParen)
            }
            ')' => {
                if !self.in_params {
                    return self.fail(
                        LexerError::UnexpectedCloseParen { offset: start.offset },
                        start,
                    );
                }
                self.in_params = false;
                self.single(TokenKind::CloseParen)
            }
            ',' => self.single(TokenKind::Comma),
            '=' => self.single(TokenKind::Equals),
            '\'' => return self.quoted_literal(start),
            c if is_ident_char(c) => return self.identifier(start),
            c => {
                return self.fail(
                    LexerError::UnexpectedCharacter {
                        character: c,
                        offset: start.offset,
                    },
                    start,
                )
            }
        };

        log_debug!("Token", "kind" => token.kind, "spelling" => token.spelling.as_str());
        Ok(token)
    }

    fn identifier(&mut self, start: Position) -> Result<Token, LexerError> {
        while let Some(ch) = self.peek_char() {
            if !is_ident_char(ch) {
                break;
            }
            self.bump();
        }

        let spelling = &self.text[start.offset..self.pos.offset];
        if spelling.len() > MAX_IDENTIFIER_LENGTH {
            let error = LexerError::IdentifierTooLong {
                length: spelling.len(),
                offset: start.offset,
            };
            return self.fail(error, start);
        }

        Ok(Token::new(
            TokenKind::Ident,
            spelling,
            Span::new(start, self.pos),
        ))
    }

    fn quoted_literal(&mut self, start: Position) -> Result<Token, LexerError> {
        self.bump();
        let content_start = self.pos.offset;

        loop {
            match self.bump() {
                Some('\'') => break,
                Some(_) => {}
                None => {
                    let error = LexerError::UnterminatedString {
                        offset: start.offset,
                        fragment: self.text[start.offset..].to_string(),
                    };
                    return self.fail(error, start);
                }
            }
        }

        let content_end = self.pos.offset - 1;
        let spelling = &self.text[content_start..content_end];
        if spelling.len() > MAX_IDENTIFIER_LENGTH {
            let error = LexerError::IdentifierTooLong {
                length: spelling.len(),
                offset: start.offset,
            };
            return self.fail(error, start);
        }

        Ok(Token::new(
            TokenKind::Ident,
            spelling,
            Span::new(start, self.pos),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn lex(text: &str) -> Result<Vec<Token>, LexerError> {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.reset(text)?;
        let mut tokens = Vec::new();
        loop {
            let token = analyzer.next_token()?;
            let done = token.is_end();
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn kinds(text: &str) -> Vec<TokenKind> {
        lex(text).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_separators_outside_parens() {
        let tokens = lex("persistent, user_id+ orb_ctrl_model").unwrap();
        let spellings: Vec<_> = tokens.iter().map(|t| t.spelling.as_str()).collect();
        assert_eq!(
            spellings,
            vec!["persistent", "user_id", "orb_ctrl_model", "<end-of-policy-list>"]
        );
    }

    #[test]
    fn test_parameter_list_tokens() {
        assert_eq!(
            kinds("foo(bar=1, 'baz')"),
            vec![
                TokenKind::Ident,
                TokenKind::OpenParen,
                TokenKind::Ident,
                TokenKind::Equals,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::CloseParen,
                TokenKind::EndOfStream,
            ]
        );
    }

    #[test]
    fn test_quoted_literal_spelling_is_raw_content() {
        let tokens = lex("'a b,c'").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].spelling, "a b,c");
    }

    #[test]
    fn test_identifier_characters() {
        let tokens = lex("orbix.no_lease IDL:acme/x:1.0").unwrap_err();
        assert_matches!(tokens, LexerError::UnexpectedCharacter { character: '/', .. });

        let tokens = lex("orbix.no_lease a::b 3.25").unwrap();
        assert_eq!(tokens[0].spelling, "orbix.no_lease");
        assert_eq!(tokens[1].spelling, "a::b");
        assert_eq!(tokens[2].spelling, "3.25");
    }

    #[test]
    fn test_end_of_stream_repeats() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.reset("  ").unwrap();
        for _ in 0..3 {
            let token = analyzer.next_token().unwrap();
            assert!(token.is_end());
            assert_eq!(token.spelling, "<end-of-policy-list>");
        }
    }

    #[test]
    fn test_unterminated_string() {
        let error = lex("foo('abc").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Unterminated string literal in policy list at offset 4: 'abc"
        );
        assert_matches!(
            error,
            LexerError::UnterminatedString { offset: 4, ref fragment } if fragment == "'abc"
        );
    }

    #[test]
    fn test_paren_errors() {
        let error = lex("foo(a(b))").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Unexpected '(' inside a parameter list at offset 5"
        );
        assert_eq!(error.offset(), 5);

        let error = lex("foo)").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Unexpected ')' outside a parameter list at offset 3"
        );
    }

    #[test]
    fn test_unexpected_character_messages() {
        let error = lex("foo; bar").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Unexpected character ';' in policy list at offset 3"
        );

        let error = lex("foo\u{7}").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Unexpected character (7) in policy list at offset 3"
        );
    }

    #[test]
    fn test_c_whitespace_separates_policies() {
        let tokens = lex("a\x0Bb\x0Cc\r\n\td").unwrap();
        let spellings: Vec<_> = tokens.iter().map(|t| t.spelling.as_str()).collect();
        assert_eq!(spellings, vec!["a", "b", "c", "d", "<end-of-policy-list>"]);

        let error = lex("a\u{A0}b").unwrap_err();
        assert_matches!(error, LexerError::UnexpectedCharacter { character: '\u{A0}', offset: 1 });
    }

    #[test]
    fn test_reset_restarts_state() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.reset("foo(").unwrap();
        analyzer.next_token().unwrap();
        analyzer.next_token().unwrap();

        analyzer.reset("bar").unwrap();
        let token = analyzer.next_token().unwrap();
        assert_eq!(token.spelling, "bar");
        assert_eq!(token.span.start().offset, 0);
    }

    #[test]
    fn test_policy_list_too_long() {
        let text = "a".repeat(MAX_POLICY_LIST_LENGTH + 1);
        let mut analyzer = LexicalAnalyzer::new();
        assert_matches!(
            analyzer.reset(&text),
            Err(LexerError::PolicyListTooLong { .. })
        );
    }

    #[test]
    fn test_identifier_too_long() {
        let text = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert_matches!(lex(&text), Err(LexerError::IdentifierTooLong { .. }));
    }
}
