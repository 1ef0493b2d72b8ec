//! pipeql-cli library
//!
//! Provides the argument parser, configuration and output rendering of the
//! `pipeql` binary for programmatic use and testing.

pub mod cli;
pub mod config;
pub mod output;

pub use config::Config;
pub use output::OutputFormat;
