//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Input parsing error (line ranges, command arguments)
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File the input belongs to, if known.
        file: Option<std::path::PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// A comment pattern failed to compile
    #[error("Invalid comment pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Settings file could not be encoded or decoded
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// System clipboard unavailable or rejected the text
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// Path the error is attached to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. } => path.as_deref(),
            Self::Parse { file, .. } => file.as_deref(),
            _ => None,
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<arboard::Error> for Error {
    fn from(e: arboard::Error) -> Self {
        Self::Clipboard(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::path::PathBuf;

    #[test]
    fn config_error_carries_hint() {
        let err = Error::config("width must be positive", "Set COLWRAP_WIDTH to a number above 0");
        assert!(err.to_string().contains("COLWRAP_WIDTH"));
    }

    #[test]
    fn io_error_exposes_path() {
        let err = Error::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            PathBuf::from("notes.md"),
        );
        assert_eq!(err.path(), Some(std::path::Path::new("notes.md")));
    }

    #[test]
    fn bad_regex_maps_to_pattern_error() {
        let err: Error = regex::Regex::new("(unclosed").unwrap_err().into();
        match err {
            Error::Pattern(_) => {}
            other => panic!("Expected Pattern error, got {other:?}"),
        }
    }
}
