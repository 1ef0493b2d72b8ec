//! Configuration management for pipeql
//!
//! Settings come from, in increasing priority: built-in defaults, a TOML
//! configuration file, `PIPEQL_*` environment variables and command-line
//! arguments.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use pipeql_parser::{ErrorStrategy, ParserOptions, MAX_DEPTH_LIMIT};
use pipeql_shared::error::config_error;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::output::OutputFormat;

/// File names searched for, in order
const CONFIG_NAMES: [&str; 2] = ["pipeql.toml", ".pipeql.toml"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Parser configuration
    pub parser: ParserOptions,
    /// Output configuration
    pub output: OutputConfig,
    /// Debug and diagnostic configuration
    pub debug: DebugConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,
    /// Whether to pretty-print trees and JSON
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Tree,
            pretty: true,
        }
    }
}

/// Debug and diagnostic configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log verbosity (0 = warnings, 3 = trace)
    pub verbosity: u8,
}

impl Config {
    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_file(path)?;
        Ok(config)
    }

    /// Load configuration from the standard locations and the environment
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::find_config_file(None) {
            log::debug!("loading configuration from {}", config_path.display());
            config.merge_file(&config_path)?;
        }

        config.merge_env();

        Ok(config)
    }

    /// Find a configuration file in the standard locations
    ///
    /// The current directory is searched first, then the user configuration
    /// directory (`pipeql/pipeql.toml`), then the home directory.
    pub fn find_config_file(current_dir: Option<&Path>) -> Option<PathBuf> {
        let current_dir = match current_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        let mut candidates: Vec<PathBuf> =
            CONFIG_NAMES.iter().map(|name| current_dir.join(name)).collect();
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("pipeql").join("pipeql.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.extend(CONFIG_NAMES.iter().map(|name| home.join(name)));
        }

        candidates.into_iter().find(|path| path.is_file())
    }

    /// Replace the settings with those of a TOML file
    ///
    /// Sections and keys missing from the file take their default values.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            config_error(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        match path.extension().and_then(|ext| ext.to_str()).unwrap_or("") {
            "toml" => {
                *self = toml::from_str(&content)
                    .map_err(|e| config_error(format!("Invalid TOML config: {}", e)))?;
            }
            _ => return Err(config_error("Unsupported config file format")),
        }

        Ok(())
    }

    /// Merge configuration from environment variables
    pub fn merge_env(&mut self) {
        self.merge_env_with_reader(|key| std::env::var(key).ok())
    }

    /// Merge configuration from environment variables with a custom reader
    ///
    /// A variable holding an invalid value resets its setting to the default.
    pub fn merge_env_with_reader<F>(&mut self, env_reader: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = env_reader("PIPEQL_MAX_DEPTH") {
            self.parser.max_depth = val
                .parse()
                .unwrap_or_else(|_| ParserOptions::default().max_depth);
        }

        if let Some(val) = env_reader("PIPEQL_ERROR_STRATEGY") {
            self.parser.error_strategy = val.parse().unwrap_or_default();
        }

        if let Some(val) = env_reader("PIPEQL_FORMAT") {
            self.output.format = val.parse().unwrap_or_default();
        }

        if let Some(val) = env_reader("PIPEQL_PRETTY") {
            self.output.pretty = val != "0" && val.to_lowercase() != "false";
        }

        if let Some(val) = env_reader("PIPEQL_VERBOSITY") {
            self.debug.verbosity = val.parse().unwrap_or_default();
        }
    }

    /// Apply command-line overrides
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(max_depth) = cli.max_depth {
            self.parser.max_depth = max_depth;
        }
        if cli.bail {
            self.parser.error_strategy = ErrorStrategy::Bail;
        }
        if let Some(format) = cli.format {
            self.output.format = format;
        }
        if cli.compact {
            self.output.pretty = false;
        }
        if cli.verbose > 0 {
            self.debug.verbosity = cli.verbose;
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| config_error(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| config_error(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

/// Create a default config file
pub fn create_default_config_file(path: &Path) -> Result<()> {
    Config::default().save(path)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.parser.max_depth == 0 {
        return Err(config_error("max_depth must be greater than 0"));
    }
    if config.parser.max_depth > MAX_DEPTH_LIMIT {
        return Err(config_error(format!(
            "max_depth must be at most {}",
            MAX_DEPTH_LIMIT
        )));
    }

    if config.debug.verbosity > 3 {
        log::warn!(
            "verbosity {} is higher than the most detailed level (3)",
            config.debug.verbosity
        );
    }

    Ok(())
}
