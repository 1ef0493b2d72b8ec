//! pipeql-parser: Parser for the pipeql pipe query language
//!
//! This crate turns the token vector produced by `pipeql-lexer` into a
//! concrete parse tree. The grammar engine is a hand-written recursive
//! descent recogniser with precedence climbing for the left-recursive
//! expression rules, so `a + b * c` and `a or b and c` nest the usual way and
//! `from x | where y | limit 1` builds a left-nested pipeline.
//!
//! # Features
//!
//! - **Full parse tree**: every consumed token is a leaf, every rule a node,
//!   and alternatives carry their own label (`logicalBinary`, `dereference`)
//! - **Error recovery**: syntax errors are attached to the node that raised
//!   them and parsing resumes at the next token the open rules can follow with
//! - **Bail mode**: stop at the first syntax error instead
//! - **Depth guard**: inputs nested deeper than the configured limit fail fast
//! - **Listeners**: enter/exit callbacks per node kind via [`ParseTreeWalker`]
//! - **Typed views**: tagged unions over the tree in [`typed`]
//!
//! # Quick Start
//!
//! ```rust
//! use pipeql_parser::{NodeKind, Parser};
//!
//! let tokens = pipeql_lexer::tokenize("from logs | where status >= 500 | limit 10").unwrap();
//! let tree = Parser::new().parse(&tokens)?;
//!
//! assert!(tree.is_valid());
//! assert_eq!(tree.root().kind(), NodeKind::SingleStatement);
//! assert!(tree.root().find(NodeKind::Comparison).is_some());
//! # Ok::<(), pipeql_parser::ParseError>(())
//! ```
//!
//! # Error Handling
//!
//! Recoverable errors end up in the tree, terminal ones in the `Err`:
//!
//! ```rust
//! use pipeql_parser::{ParseError, Parser};
//!
//! let tokens = pipeql_lexer::tokenize("from logs | where | limit 10").unwrap();
//! match Parser::new().parse(&tokens) {
//!     Ok(tree) => {
//!         for error in tree.diagnostics() {
//!             eprintln!("{}", error);
//!         }
//!     }
//!     Err(ParseError::TooDeep(error)) => eprintln!("nested too deeply: {}", error),
//!     Err(e) => eprintln!("parse failed: {}", e),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown,
    clippy::uninlined_format_args
)]

pub mod error;
pub mod grammar;
pub mod listener;
pub mod options;
mod parser;
pub mod stream;
pub mod tree;
pub mod typed;
#[cfg(test)]
mod tests;

pub use error::{ParseError, Result, SyntaxError, SyntaxErrorKind};
pub use grammar::{GrammarTable, NodeKind, Rule, RuleInfo, GRAMMAR};
pub use listener::{ParseTreeListener, ParseTreeWalker};
pub use options::{ErrorStrategy, ParserOptions, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
pub use parser::Parser;
pub use stream::{TokenSource, TokenStream};
pub use tree::{Child, ChildRef, NodeId, NodeRef, ParseTree, TokenSpan};
pub use typed::TypedNode;

// Re-export shared types
pub use pipeql_shared::{Span, Token, TokenKind, TokenSet, VERSION};
