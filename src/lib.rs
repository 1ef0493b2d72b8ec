//! pipeql: parse pipe queries into concrete parse trees
//!
//! This crate ties the [`pipeql_lexer`] token source to the [`pipeql_parser`]
//! grammar engine. Use it when you have query text; use the member crates
//! directly when you bring your own tokens.
//!
//! ```rust
//! let tree = pipeql::parse("from logs | where status >= 500 | limit 10").unwrap();
//! assert!(tree.is_valid());
//!
//! let names: Vec<_> = tree
//!     .statement()
//!     .unwrap()
//!     .query()
//!     .unwrap()
//!     .pipeline()
//!     .iter()
//!     .map(|command| command.name())
//!     .collect();
//! assert_eq!(names, ["from", "where", "limit"]);
//! ```
//!
//! A query with syntax errors still produces a tree; the errors are attached
//! to the nodes where they were detected:
//!
//! ```rust
//! let tree = pipeql::parse("from logs | eval | limit 5").unwrap();
//! let errors: Vec<String> = tree.diagnostics().iter().map(|e| e.to_string()).collect();
//! assert_eq!(errors, ["line 1:18 no viable alternative at input '|'"]);
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

use thiserror::Error;

pub use pipeql_lexer::{LexError, LexMode, Lexer};
pub use pipeql_parser::{
    typed, ErrorStrategy, NodeKind, NodeRef, ParseError, ParseTree, ParseTreeListener,
    ParseTreeWalker, Parser, ParserOptions, Rule, SyntaxError, TypedNode,
};
pub use pipeql_shared::{Span, Token, TokenKind, TokenSet, VERSION};

/// Errors from parsing query text
#[derive(Debug, Error)]
pub enum Error {
    /// The text could not be split into tokens
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The parser gave up
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type for the text-level entry points
pub type Result<T> = std::result::Result<T, Error>;

/// Split `source` into tokens, ending with `EOF`
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Ok(pipeql_lexer::tokenize(source)?)
}

/// Parse a full query with the default options
pub fn parse(source: &str) -> Result<ParseTree> {
    parse_with_options(source, ParserOptions::default())
}

/// Parse a full query
pub fn parse_with_options(source: &str, options: ParserOptions) -> Result<ParseTree> {
    let tokens = pipeql_lexer::tokenize(source)?;
    log::debug!("parsing {} tokens", tokens.len());
    Ok(Parser::with_options(options).parse(&tokens)?)
}

/// Parse a standalone boolean expression such as `a + 1 > b`
pub fn parse_expression(source: &str) -> Result<ParseTree> {
    let tokens = pipeql_lexer::tokenize_expression(source)?;
    Ok(Parser::new().parse_expression(&tokens)?)
}
