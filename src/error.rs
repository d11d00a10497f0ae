//! Error types for the word2backlog library.

use std::io;
use thiserror::Error;

/// Result type alias for word2backlog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a document.
///
/// Every variant is fatal: a conversion either yields the complete item list
/// or one of these.
#[derive(Error, Debug)]
pub enum Error {
    /// The package cannot be opened, a mandatory part is absent, or a part
    /// does not parse.
    #[error("Malformed package: {0}")]
    MalformedPackage(String),

    /// A paragraph references a style id that the style table does not define.
    #[error("Unknown style reference: {0}")]
    UnknownStyleReference(String),

    /// A drawing's relationship id cannot be resolved to an image part.
    #[error("Unresolved image part {id}: {reason}")]
    UnresolvedImagePart {
        /// Relationship id carried by the drawing (empty if it had none).
        id: String,
        /// What went wrong.
        reason: String,
    },

    /// I/O failure while reading the input or an embedded part.
    #[error("Stream read failure: {0}")]
    StreamRead(#[from] io::Error),

    /// The item list could not be serialized.
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn unresolved(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::UnresolvedImagePart {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::StreamRead(e),
            other => Error::MalformedPackage(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedPackage(format!("XML parse error: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownStyleReference("Heading9".to_string());
        assert_eq!(err.to_string(), "Unknown style reference: Heading9");

        let err = Error::unresolved("rId7", "no such relationship");
        assert_eq!(
            err.to_string(),
            "Unresolved image part rId7: no such relationship"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "truncated");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::StreamRead(_)));
    }

    #[test]
    fn test_error_from_zip() {
        let err: Error = zip::result::ZipError::InvalidArchive("bad header".into()).into();
        assert!(matches!(err, Error::MalformedPackage(_)));
    }
}
