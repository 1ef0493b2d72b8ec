//! pipeql-shared: Shared types and utilities for pipeql crates
//!
//! This crate contains the token model exchanged between the lexer (the token
//! source) and the parser, plus small utilities used across the workspace.
//!
//! # Features
//!
//! - **Token model**: [`TokenKind`], [`Token`], [`Span`] and the [`TokenSet`] bit set
//! - **Vocabulary names**: symbolic (`INTEGER_LITERAL`) and literal (`'|'`) names
//! - **Common Result Type**: Standardized Result type alias for application code
//! - **Version Information**: crate version metadata

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

/// Result type alias for pipeql application code
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Token kinds, tokens and token sets
pub mod token;

pub use token::{Span, Token, TokenKind, TokenSet};

/// Common error handling utilities
pub mod error {
    /// Create a configuration error
    pub fn config_error(msg: impl Into<String>) -> anyhow::Error {
        anyhow::anyhow!("Configuration error: {}", msg.into())
    }

    /// Create an input error (unreadable query file, empty stdin, ...)
    pub fn input_error(msg: impl Into<String>) -> anyhow::Error {
        anyhow::anyhow!("Input error: {}", msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        let err = error::config_error("max_depth must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Configuration error: max_depth must be greater than 0"
        );
        let err = error::input_error("empty query");
        assert_eq!(err.to_string(), "Input error: empty query");
    }

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
