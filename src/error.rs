//! All error types for the polocale crate.
//!
//! These are returned from all fallible operations (culture parsing, PO
//! parsing, catalog lookup, etc.).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid culture `{0}`")]
    InvalidCulture(String),

    #[error("malformed PO content at line {line}: {message}")]
    PoFormat { line: usize, message: String },

    #[error("duplicate msgid `{key}` at line {line}")]
    DuplicateKey { key: String, line: usize },

    #[error("unsupported culture `{0}`")]
    UnsupportedCulture(String),

    #[error("localized string `{0}` was not found")]
    LocalizedStringNotFound(String),

    #[error("no PO resource found for `{0}` in any culture")]
    MissingManifest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new PO format error anchored to a 1-based line number.
    pub fn po_format(line: usize, message: impl Into<String>) -> Self {
        Error::PoFormat {
            line,
            message: message.into(),
        }
    }

    /// Creates a new invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_invalid_culture_error() {
        let error = Error::InvalidCulture("not a culture".to_string());
        assert_eq!(error.to_string(), "invalid culture `not a culture`");
    }

    #[test]
    fn test_po_format_error() {
        let error = Error::po_format(12, "unterminated quoted literal");
        assert_eq!(
            error.to_string(),
            "malformed PO content at line 12: unterminated quoted literal"
        );
    }

    #[test]
    fn test_duplicate_key_error() {
        let error = Error::DuplicateKey {
            key: "Hello".to_string(),
            line: 8,
        };
        assert_eq!(error.to_string(), "duplicate msgid `Hello` at line 8");
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_localized_string_not_found_error() {
        let error = Error::LocalizedStringNotFound("Greeting".to_string());
        assert_eq!(
            error.to_string(),
            "localized string `Greeting` was not found"
        );
    }

    #[test]
    fn test_missing_manifest_error() {
        let error = Error::MissingManifest("MyApp.Messages".to_string());
        assert!(error.to_string().contains("no PO resource found"));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::UnsupportedCulture("xx".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("UnsupportedCulture"));
        assert!(debug.contains("xx"));
    }
}
