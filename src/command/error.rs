//! Command parsing errors.

use thiserror::Error;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Command parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} requires {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("{command} takes at most {max} argument(s)")]
    TooManyArguments { command: &'static str, max: usize },

    #[error("{command} requires a non-negative integer, got '{value}'")]
    InvalidInteger { command: &'static str, value: String },

    #[error("empty command")]
    Empty,
}
