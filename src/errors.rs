/*!
 * Error types for the subresync application.
 *
 * Library operations report typed errors built with the thiserror crate;
 * the application layer adds context with `anyhow::Error`.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while converting text into a time code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeCodeError {
    /// The `,` separating seconds from milliseconds was not found
    #[error("missing ',' milliseconds separator in time code '{0}'")]
    MissingMillisSeparator(String),
}

/// Structural problems found while parsing a subtitle file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// First non-blank line does not start with a digit
    #[error("line {line}: first non-blank line should start with a digit: '{content}'")]
    MissingLeadingDigit {
        line: usize,
        content: String,
    },

    /// A time stamp line without the " --> " delimiter
    #[error("line {line}: cannot find \" --> \" in time stamp line: '{content}'")]
    MissingArrow {
        line: usize,
        content: String,
    },

    /// A time stamp half that is not a time code
    #[error("line {line}: {source}")]
    BadTimeCode {
        line: usize,
        #[source]
        source: TimeCodeError,
    },

    /// Intervals and texts do not pair up after a full scan
    #[error("parsed {intervals} time stamps but {texts} texts")]
    CountMismatch {
        intervals: usize,
        texts: usize,
    },
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Input file cannot be opened or read
    #[error("cannot read subtitle file {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file cannot be created or written
    #[error("cannot write subtitle file {}: {source}", path.display())]
    FileUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed subtitle content
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Resync could not find enough similar texts
    #[error("cannot find enough similar texts: found {found}, need at least {required}")]
    InsufficientMatches {
        found: usize,
        required: usize,
    },
}

impl SubtitleError {
    /// Whether this error comes from malformed content rather than I/O or matching
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

/// Errors raised by the application layer itself
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
