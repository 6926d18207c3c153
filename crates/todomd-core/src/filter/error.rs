//! Error types for the filter parser.

use thiserror::Error;

/// A specialized Result type for filter parsing operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur during filter parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The filter expression is empty.
    #[error("filter expression is empty")]
    EmptyExpression,

    /// An unexpected token was encountered during parsing.
    #[error("unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        /// The unexpected token that was encountered.
        token: String,
        /// Byte offset of the token in the expression.
        position: usize,
    },

    /// An unexpected end of input was encountered.
    #[error("unexpected end of expression")]
    UnexpectedEndOfInput,

    /// An unclosed parenthesis was found.
    #[error("unclosed parenthesis")]
    UnclosedParenthesis,

    /// A `$keyword` that is not recognized.
    #[error("unknown filter keyword: ${keyword}{}", suggestion_hint(.suggestion))]
    UnknownKeyword {
        /// The unrecognized keyword, without the `$`.
        keyword: String,
        /// The closest known keyword, if any is close enough.
        suggestion: Option<String>,
    },

    /// A sigil (`#`, `+`, `@`, `$`) with nothing after it.
    #[error("expected a name after '{sigil}' at position {position}")]
    EmptyName {
        /// The sigil character.
        sigil: char,
        /// Byte offset of the sigil.
        position: usize,
    },
}

impl FilterError {
    /// Creates an unexpected token error.
    pub fn unexpected_token(token: impl Into<String>, position: usize) -> Self {
        FilterError::UnexpectedToken {
            token: token.into(),
            position,
        }
    }

    /// Creates an unknown keyword error.
    pub fn unknown_keyword(keyword: impl Into<String>, suggestion: Option<String>) -> Self {
        FilterError::UnknownKeyword {
            keyword: keyword.into(),
            suggestion,
        }
    }
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(keyword) => format!(" (did you mean ${keyword}?)"),
        None => String::new(),
    }
}
