//! Parser configuration

use serde::{Deserialize, Serialize};

/// Default maximum rule nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Largest `max_depth` that is safe on a default 8 MiB main-thread stack
///
/// Every open rule is a native call frame. Embedders parsing on smaller
/// thread stacks should stay well below this.
pub const MAX_DEPTH_LIMIT: usize = 2048;

/// What the parser does after a syntax error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStrategy {
    /// Attach the error to the node, resynchronise and keep parsing
    #[default]
    Recover,
    /// Stop at the first syntax error
    Bail,
}

impl std::str::FromStr for ErrorStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recover" => Ok(ErrorStrategy::Recover),
            "bail" => Ok(ErrorStrategy::Bail),
            other => Err(format!("unknown error strategy '{}'", other)),
        }
    }
}

impl std::fmt::Display for ErrorStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorStrategy::Recover => write!(f, "recover"),
            ErrorStrategy::Bail => write!(f, "bail"),
        }
    }
}

/// Options for a [`Parser`](crate::Parser)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Maximum number of nested rule invocations before failing with
    /// `GrammarTooDeep`
    ///
    /// The parser recurses once per open rule, so values far above
    /// [`MAX_DEPTH_LIMIT`] can overflow the stack before the guard fires.
    pub max_depth: usize,
    /// Error handling strategy
    pub error_strategy: ErrorStrategy,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            error_strategy: ErrorStrategy::Recover,
        }
    }
}

impl ParserOptions {
    /// Set the maximum nesting depth
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the error strategy
    pub fn error_strategy(mut self, error_strategy: ErrorStrategy) -> Self {
        self.error_strategy = error_strategy;
        self
    }
}
