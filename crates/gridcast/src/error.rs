//! Error types for parsing column formats and driving exports.

use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;

/// Errors raised while parsing a column format string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The width segment of a column token is not a non-negative integer.
    #[error("invalid width '{value}' for column '{column}': {source}")]
    InvalidWidth {
        column: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Result type for column format parsing.
pub type Result<T> = std::result::Result<T, FormatError>;

/// Error returned by an export call.
///
/// Generic over the sink's own error type so sinks keep their error
/// vocabulary. A `Format` error always fires before any sink callback.
#[derive(Debug)]
pub enum ExportError<E> {
    /// The column format string could not be parsed.
    Format(FormatError),
    /// The sink rejected a cell or header; the export stopped there.
    Sink(E),
}

impl<E> ExportError<E> {
    /// Returns the sink error, if this is one.
    pub fn sink_error(&self) -> Option<&E> {
        match self {
            ExportError::Sink(err) => Some(err),
            ExportError::Format(_) => None,
        }
    }

    /// Returns the format error, if this is one.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            ExportError::Format(err) => Some(err),
            ExportError::Sink(_) => None,
        }
    }

    /// Maps the sink error with `f`, leaving format errors untouched.
    pub fn map_sink<F, O>(self, f: O) -> ExportError<F>
    where
        O: FnOnce(E) -> F,
    {
        match self {
            ExportError::Format(err) => ExportError::Format(err),
            ExportError::Sink(err) => ExportError::Sink(f(err)),
        }
    }
}

impl<E: fmt::Display> fmt::Display for ExportError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Format(err) => write!(f, "column format error: {}", err),
            ExportError::Sink(err) => write!(f, "sink error: {}", err),
        }
    }
}

impl<E> std::error::Error for ExportError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Format(err) => Some(err),
            ExportError::Sink(err) => Some(err),
        }
    }
}

impl<E> From<FormatError> for ExportError<E> {
    fn from(err: FormatError) -> Self {
        ExportError::Format(err)
    }
}
