//! Command implementations for the raf CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod check;
pub mod completions;
pub mod config;
pub mod filter;
pub mod operators;

use std::env;

use ra_filter::{FilterError, RecordError};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter parsing error.
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// An input item could not be turned into a record.
    #[error("invalid record {index} in {source_name}: {error}")]
    Record {
        /// Where the record came from (file path or "stdin").
        source_name: String,
        /// Zero-based position of the record within its source.
        index: usize,
        /// What was wrong with it.
        #[source]
        error: RecordError,
    },

    /// An input source is not valid JSON.
    #[error("invalid JSON in {source_name}: {error}")]
    InvalidJson {
        /// Where the text came from (file path or "stdin").
        source_name: String,
        /// The parse failure.
        #[source]
        error: serde_json::Error,
    },

    /// Input JSON does not hold a record array.
    #[error("invalid input: {0}")]
    Input(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Colors are on unless `--no-color`, `NO_COLOR` or `output.color = false`
    /// turns them off.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        let no_color_env = env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && !no_color_env && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
        }
    }
}
