//! Command implementations for the tmd CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod archive;
pub mod completions;
pub mod config;
pub mod groups;
pub mod list;
pub mod next;
pub mod reset;
pub mod toggle;
pub mod tree;

use std::env;
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use todomd_core::config::ConfigError;
use todomd_core::filter::FilterError;
use todomd_core::sort::SortError;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter parsing error.
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Unsupported sort property.
    #[error("{0}")]
    Sort(#[from] SortError),

    /// Invalid parse or edit settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A line number that holds no task.
    #[error("no task on line {0}")]
    NoTaskOnLine(usize),

    /// Reading or writing a task file failed.
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Wraps an I/O error with the path it happened on.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
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
    /// Whether to be verbose.
    pub verbose: bool,
    /// The moment every due date is evaluated against.
    pub now: NaiveDateTime,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Samples the local clock; colors are off with `--no-color` or when
    /// `NO_COLOR` is set.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            verbose: cli.verbose,
            now: Local::now().naive_local(),
        }
    }

    /// Applies the `[output]` settings of the config file.
    pub fn with_config(mut self, config: &config::Config) -> Self {
        if config.output.color == Some(false) {
            self.use_colors = false;
        }
        self
    }
}
