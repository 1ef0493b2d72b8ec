//! Error types for the pipeql parser
//!
//! [`SyntaxError`] is what gets attached to a parse-tree node when a rule
//! fails locally. [`ParseError`] is the only error a caller of
//! [`Parser::parse`](crate::Parser::parse) ever sees: it is returned when the
//! parse could not continue at all.

use pipeql_shared::{Token, TokenKind, TokenSet};
use serde::Serialize;
use thiserror::Error;

use crate::grammar::Rule;

/// The kinds of syntax errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyntaxErrorKind {
    /// A required token did not match the expected kind
    MismatchedToken,
    /// No alternative of a decision matched the lookahead
    NoViableAlternative,
    /// A precedence guard failed
    FailedPredicate {
        /// The failing predicate
        predicate: String,
    },
    /// Rule nesting exceeded the configured maximum depth
    GrammarTooDeep {
        /// The configured maximum depth
        max_depth: usize,
    },
}

/// A syntax error at a specific token
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("line {line}:{column} {message}")]
pub struct SyntaxError {
    /// What went wrong
    pub kind: SyntaxErrorKind,
    /// Rule in which the error was detected
    pub rule: Rule,
    /// Index of the offending token
    pub token_index: usize,
    /// Kind of the offending token
    pub found: TokenKind,
    /// Text of the offending token
    pub text: String,
    /// Tokens that would have been accepted
    pub expected: TokenSet,
    /// Byte offset of the offending token
    pub offset: usize,
    /// Line of the offending token
    pub line: usize,
    /// Column of the offending token
    pub column: usize,
    /// Human readable message
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn new(
        kind: SyntaxErrorKind,
        rule: Rule,
        token_index: usize,
        token: &Token,
        expected: TokenSet,
    ) -> Self {
        let input = quote(token);
        let message = match &kind {
            SyntaxErrorKind::MismatchedToken => {
                format!("mismatched input {} expecting {}", input, expected)
            }
            SyntaxErrorKind::NoViableAlternative => {
                format!("no viable alternative at input {}", input)
            }
            SyntaxErrorKind::FailedPredicate { predicate } => {
                format!("rule {} failed predicate: {{{}}}?", rule.name(), predicate)
            }
            SyntaxErrorKind::GrammarTooDeep { max_depth } => format!(
                "rule nesting deeper than {} at input {}",
                max_depth, input
            ),
        };
        Self {
            kind,
            rule,
            token_index,
            found: token.kind,
            text: token.text.clone(),
            expected,
            offset: token.span.start,
            line: token.span.line,
            column: token.span.column,
            message,
        }
    }

    /// A mismatched token that was dropped so the expected one could match
    pub(crate) fn extraneous(rule: Rule, token_index: usize, token: &Token, expected: TokenSet) -> Self {
        let mut error = Self::new(
            SyntaxErrorKind::MismatchedToken,
            rule,
            token_index,
            token,
            expected,
        );
        error.message = format!("extraneous input {} expecting {}", quote(token), expected);
        error
    }

    /// A trailing token after a complete standalone expression
    pub(crate) fn trailing(rule: Rule, token_index: usize, token: &Token) -> Self {
        Self::new(
            SyntaxErrorKind::MismatchedToken,
            rule,
            token_index,
            token,
            TokenSet::of(&[TokenKind::Eof]),
        )
    }
}

fn quote(token: &Token) -> String {
    if token.is_eof() {
        "<EOF>".to_string()
    } else {
        format!("'{}'", token.text)
    }
}

/// Terminal parse failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Recovery ran into the end of input without finding a resynchronisation point
    #[error("unrecoverable syntax error: {0}")]
    Unrecoverable(SyntaxError),

    /// The bail strategy stopped at the first syntax error
    #[error("syntax error: {0}")]
    Bailed(SyntaxError),

    /// Rule nesting exceeded the maximum depth
    #[error("input nested too deeply: {0}")]
    TooDeep(SyntaxError),

    /// The token stream holds nothing but end-of-input
    #[error("empty input")]
    EmptyInput,
}

impl ParseError {
    /// The syntax error behind the failure, if any
    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Unrecoverable(error)
            | ParseError::Bailed(error)
            | ParseError::TooDeep(error) => Some(error),
            ParseError::EmptyInput => None,
        }
    }
}

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pipeql_shared::Span;

    fn token(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Span::new(10, 10 + text.len(), 2, 4))
    }

    #[test]
    fn test_mismatched_message() {
        let error = SyntaxError::new(
            SyntaxErrorKind::MismatchedToken,
            Rule::LimitCommand,
            3,
            &token(TokenKind::UnquotedIdentifier, "x"),
            TokenSet::of(&[TokenKind::IntegerLiteral]),
        );
        assert_eq!(error.to_string(), "line 2:4 mismatched input 'x' expecting INTEGER_LITERAL");
        assert_eq!(error.offset, 10);
    }

    #[test]
    fn test_no_viable_message_at_eof() {
        let error = SyntaxError::new(
            SyntaxErrorKind::NoViableAlternative,
            Rule::PrimaryExpression,
            7,
            &Token::eof(Span::new(20, 20, 1, 21)),
            TokenSet::EMPTY,
        );
        assert_eq!(error.message, "no viable alternative at input <EOF>");
    }

    #[test]
    fn test_parse_error_exposes_syntax_error() {
        let error = SyntaxError::trailing(Rule::BooleanExpression, 1, &token(TokenKind::Rp, ")"));
        assert_eq!(error.message, "mismatched input ')' expecting <EOF>");
        let failure = ParseError::Bailed(error.clone());
        assert_eq!(failure.syntax_error(), Some(&error));
        assert_eq!(ParseError::EmptyInput.syntax_error(), None);
        assert_eq!(ParseError::EmptyInput.to_string(), "empty input");
    }
}
