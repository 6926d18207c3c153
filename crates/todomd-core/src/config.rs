//! Explicit configuration values threaded into parsing and edit producers.
//!
//! Nothing in the core reads configuration from global state: callers build a
//! [`ParseConfig`] / [`EditConfig`] (usually from their own settings file) and
//! pass it to every call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default literal that marks a completed task.
pub const DEFAULT_DONE_SYMBOL: &str = "x ";

/// Default tab width used to compute indent levels.
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Errors for invalid configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Tab size must be at least 1.
    #[error("tab size must be greater than zero")]
    ZeroTabSize,

    /// The done symbol must not be empty.
    #[error("done symbol must not be empty")]
    EmptyDoneSymbol,
}

/// Settings that influence how lines are parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Width of one indent level.
    pub tab_size: usize,

    /// Literal prefix marking a task as done.
    pub done_symbol: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
            done_symbol: DEFAULT_DONE_SYMBOL.to_string(),
        }
    }
}

impl ParseConfig {
    /// Sets the tab size.
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }

    /// Sets the done symbol.
    pub fn with_done_symbol(mut self, done_symbol: impl Into<String>) -> Self {
        self.done_symbol = done_symbol.into();
        self
    }

    /// Checks the values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTabSize`] or [`ConfigError::EmptyDoneSymbol`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_size == 0 {
            return Err(ConfigError::ZeroTabSize);
        }
        if self.done_symbol.is_empty() {
            return Err(ConfigError::EmptyDoneSymbol);
        }
        Ok(())
    }
}

/// Settings for the edit producers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Literal prefix marking a task as done.
    pub done_symbol: String,

    /// Mark completion with a `{cm:…}` annotation instead of the done symbol.
    pub add_completion_date: bool,

    /// Include the time in `{cm:…}`.
    pub completion_date_include_time: bool,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            done_symbol: DEFAULT_DONE_SYMBOL.to_string(),
            add_completion_date: false,
            completion_date_include_time: false,
        }
    }
}

impl EditConfig {
    /// Builds an edit config sharing the done symbol of `parse`.
    pub fn from_parse_config(parse: &ParseConfig) -> Self {
        Self {
            done_symbol: parse.done_symbol.clone(),
            ..Self::default()
        }
    }

    /// Enables or disables `{cm:…}` completion dates.
    pub fn with_completion_date(mut self, enabled: bool, include_time: bool) -> Self {
        self.add_completion_date = enabled;
        self.completion_date_include_time = include_time;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParseConfig::default();
        assert_eq!(config.tab_size, 4);
        assert_eq!(config.done_symbol, "x ");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_tab_size() {
        let config = ParseConfig::default().with_tab_size(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTabSize));
    }

    #[test]
    fn test_validate_rejects_empty_done_symbol() {
        let config = ParseConfig::default().with_done_symbol("");
        assert_eq!(config.validate(), Err(ConfigError::EmptyDoneSymbol));
    }

    #[test]
    fn test_edit_config_from_parse_config() {
        let parse = ParseConfig::default().with_done_symbol("[x] ");
        let edit = EditConfig::from_parse_config(&parse).with_completion_date(true, false);
        assert_eq!(edit.done_symbol, "[x] ");
        assert!(edit.add_completion_date);
        assert!(!edit.completion_date_include_time);
    }
}
