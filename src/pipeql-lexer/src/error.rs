//! Error types for the pipeql lexer

use thiserror::Error;

/// Errors raised while turning source text into tokens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A string literal runs to the end of the input
    #[error("line {line}:{column} unterminated string literal")]
    UnterminatedString {
        /// Byte offset of the opening quote
        offset: usize,
        /// Line of the opening quote
        line: usize,
        /// Column of the opening quote
        column: usize,
    },

    /// A quoted identifier runs to the end of the input
    #[error("line {line}:{column} unterminated quoted identifier")]
    UnterminatedIdentifier {
        /// Byte offset of the opening backtick
        offset: usize,
        /// Line of the opening backtick
        line: usize,
        /// Column of the opening backtick
        column: usize,
    },

    /// A block comment is never closed
    #[error("line {line}:{column} unterminated block comment")]
    UnterminatedComment {
        /// Byte offset of the `/*`
        offset: usize,
        /// Line of the `/*`
        line: usize,
        /// Column of the `/*`
        column: usize,
    },

    /// No token can start with this character in the current mode
    #[error("line {line}:{column} token recognition error at: '{found}'")]
    UnexpectedCharacter {
        /// The offending character
        found: char,
        /// Byte offset of the character
        offset: usize,
        /// Line of the character
        line: usize,
        /// Column of the character
        column: usize,
    },
}

impl LexError {
    /// Byte offset the error points at
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnterminatedString { offset, .. }
            | LexError::UnterminatedIdentifier { offset, .. }
            | LexError::UnterminatedComment { offset, .. }
            | LexError::UnexpectedCharacter { offset, .. } => *offset,
        }
    }

    /// 1-based line and column the error points at
    pub fn position(&self) -> (usize, usize) {
        match self {
            LexError::UnterminatedString { line, column, .. }
            | LexError::UnterminatedIdentifier { line, column, .. }
            | LexError::UnterminatedComment { line, column, .. }
            | LexError::UnexpectedCharacter { line, column, .. } => (*line, *column),
        }
    }
}

/// Result type for lexing
pub type Result<T> = std::result::Result<T, LexError>;
