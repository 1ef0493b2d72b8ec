//! pipeql-lexer: Token source for the pipeql parser
//!
//! This crate turns query text into the token vector consumed by
//! `pipeql-parser`. It is mode-aware in the same way the query language is:
//! a word means something different in command position (`limit`), inside an
//! expression (`a + 1`) and inside a source list (`logs-*`).
//!
//! # Features
//!
//! - **Lexer modes**: command, expression and source modes with a mode stack
//!   for bracketed subqueries
//! - **Case-insensitive keywords**: `FROM`, `from` and `From` are the same token
//! - **Comments**: `// line` and `/* block */` comments are skipped
//! - **Positions**: byte offsets plus 1-based line and column on every token
//!
//! # Example
//!
//! ```rust
//! use pipeql_lexer::tokenize;
//! use pipeql_shared::TokenKind;
//!
//! let tokens = tokenize("from logs | limit 10").unwrap();
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::From,
//!         TokenKind::SrcUnquotedIdentifier,
//!         TokenKind::Pipe,
//!         TokenKind::Limit,
//!         TokenKind::IntegerLiteral,
//!         TokenKind::Eof,
//!     ]
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown,
    clippy::uninlined_format_args
)]

pub mod error;
pub mod lexer;
mod scanner;

pub use error::{LexError, Result};
pub use lexer::{LexMode, Lexer};

use pipeql_shared::Token;

/// Tokenize a full query, starting in command mode
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}

/// Tokenize a standalone expression, starting in expression mode
pub fn tokenize_expression(source: &str) -> Result<Vec<Token>> {
    Lexer::with_mode(source, LexMode::Expression).tokenize()
}
