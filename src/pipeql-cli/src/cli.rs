//! Command-line interface for pipeql
//!
//! This module defines the command-line arguments with clap. Values given on
//! the command line override the configuration file and the environment.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// pipeql - parse and inspect pipe queries
///
/// pipeql parses queries such as `from logs | where status >= 500 | limit 10`
/// and prints the parse tree, the tokens or the syntax errors it found.
#[derive(Parser, Debug)]
#[command(name = "pipeql")]
#[command(author, version, about)]
#[command(after_help = "EXAMPLES:\n  \
    # Print the parse tree of a query\n  \
    pipeql 'from logs | where status >= 500 | limit 10'\n\n  \
    # Read the query from a file and print JSON\n  \
    pipeql -f query.pql --format json\n\n  \
    # Parse a single expression\n  \
    pipeql --expression 'a + b * 2 > c'\n\n  \
    # Show the lexer output\n  \
    pipeql tokens 'from logs | limit 1'\n\n  \
    # Only check a query, stop at the first error\n  \
    pipeql --bail --format diagnostics 'from logs | eval'")]
pub struct Cli {
    /// The query to parse (stdin if neither QUERY nor --file is given)
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// File containing the query
    #[arg(short = 'f', long = "file", value_name = "FILE", conflicts_with = "query")]
    pub query_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Use compact output (single-line trees and JSON)
    #[arg(short, long)]
    pub compact: bool,

    /// Parse a standalone expression instead of a full query
    #[arg(short = 'e', long)]
    pub expression: bool,

    /// Maximum rule nesting depth
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Stop at the first syntax error instead of recovering
    #[arg(long)]
    pub bail: bool,

    /// Configuration file (default: search standard locations)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tokens of a query
    Tokens {
        /// The query to tokenize (stdin if neither QUERY nor --file is given)
        #[arg(value_name = "QUERY")]
        query: Option<String>,

        /// File containing the query
        #[arg(short = 'f', long = "file", value_name = "FILE", conflicts_with = "query")]
        query_file: Option<PathBuf>,

        /// Tokenize a standalone expression
        #[arg(short = 'e', long)]
        expression: bool,
    },

    /// List the grammar rules with their FIRST and FOLLOW sets
    Rules,

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Path of the configuration file
        #[arg(default_value = "pipeql.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Parse command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Parse command-line arguments from a vector (for testing)
pub fn parse_args_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_parsing() {
        let cli = parse_args_from(["pipeql", "from logs | limit 1"]).unwrap();
        assert_eq!(cli.query.as_deref(), Some("from logs | limit 1"));
        assert!(cli.command.is_none());
        assert!(!cli.bail);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parser_options() {
        let cli = parse_args_from([
            "pipeql",
            "--max-depth",
            "64",
            "--bail",
            "--format",
            "json",
            "-vv",
            "from a",
        ])
        .unwrap();
        assert_eq!(cli.max_depth, Some(64));
        assert!(cli.bail);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_query_file_conflicts_with_query() {
        assert!(parse_args_from(["pipeql", "-f", "q.pql", "from a"]).is_err());
        let cli = parse_args_from(["pipeql", "-f", "q.pql"]).unwrap();
        assert_eq!(cli.query_file, Some(PathBuf::from("q.pql")));
    }

    #[test]
    fn test_tokens_subcommand() {
        let cli = parse_args_from(["pipeql", "tokens", "-e", "a + 1"]).unwrap();
        match cli.command {
            Some(Commands::Tokens {
                query, expression, ..
            }) => {
                assert_eq!(query.as_deref(), Some("a + 1"));
                assert!(expression);
            }
            other => panic!("Expected tokens subcommand, got {:?}", other),
        }
    }

    #[test]
    fn test_config_subcommands() {
        let cli = parse_args_from(["pipeql", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: ConfigCommands::Show
            })
        ));

        let cli = parse_args_from(["pipeql", "config", "init", "--force"]).unwrap();
        match cli.command {
            Some(Commands::Config {
                command: ConfigCommands::Init { path, force },
            }) => {
                assert_eq!(path, PathBuf::from("pipeql.toml"));
                assert!(force);
            }
            other => panic!("Expected config init, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_format() {
        assert!(parse_args_from(["pipeql", "--format", "yaml", "from a"]).is_err());
    }
}
