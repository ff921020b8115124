//! Lexical analysis of policy-list strings

pub mod analyzer;

use crate::tokens::{Token, TokenKind};

pub use analyzer::{LexerError, LexicalAnalyzer};

/// Tokenize a whole policy list, including the trailing end-of-stream token
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexerError> {
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

/// Re-serialize a policy list from its token spellings.
///
/// Policies are separated by `", "`, parameters by `", "` inside their
/// parentheses, and quoted literals are re-quoted only when needed. The
/// output tokenizes to the same spellings as the input, so normalizing
/// twice yields the same string.
pub fn normalize(text: &str) -> Result<String, LexerError> {
    let tokens = tokenize(text)?;

    let mut out = String::new();
    let mut prev: Option<TokenKind> = None;
    for token in tokens.iter().filter(|t| !t.is_end()) {
        match (prev, token.kind) {
            (Some(TokenKind::Ident | TokenKind::CloseParen), TokenKind::Ident) => {
                out.push_str(", ")
            }
            (Some(TokenKind::Comma), _) => out.push(' '),
            _ => {}
        }
        out.push_str(&token.as_policy_text());
        prev = Some(token.kind);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_ends_with_end_of_stream() {
        let tokens = tokenize("persistent").unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens[1].is_end());
    }

    #[test]
    fn test_normalize() {
        let normalized =
            normalize("persistent  user_id+orb_ctrl_model, foo( a = 1 ,'b c')").unwrap();
        assert_eq!(
            normalized,
            "persistent, user_id, orb_ctrl_model, foo(a=1, 'b c')"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "persistent, user_id",
            "my_policy(timeout=30, 'retry')",
            "a b(c) d(e=f,g,h=i)",
            "",
        ];
        for input in inputs {
            let once = normalize(input).unwrap();
            let twice = normalize(&once).unwrap();
            assert_eq!(once, twice, "input: {:?}", input);

            let spellings = |s: &str| -> Vec<String> {
                tokenize(s)
                    .unwrap()
                    .into_iter()
                    .map(|t| t.spelling)
                    .collect()
            };
            assert_eq!(spellings(input), spellings(&once));
        }
    }

    #[test]
    fn test_normalize_propagates_errors() {
        assert!(normalize("foo(").is_ok());
        assert!(normalize("foo))").is_err());
    }
}
