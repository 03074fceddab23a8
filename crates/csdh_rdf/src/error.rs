//! Error types for the RDF layer.

use thiserror::Error;

/// A specialized `Result` type for RDF operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The errors raised while parsing, building or serializing RDF.
#[derive(Debug, Error)]
pub enum Error {
    /// Turtle input could not be parsed.
    #[error("invalid turtle at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A triple was built from terms that cannot occupy their position.
    #[error("invalid triple: {0}")]
    InvalidTriple(String),

    /// A variable annotation could not be converted to Data Cube terms.
    #[error("invalid annotation for variable '{variable}': {message}")]
    Annotation { variable: String, message: String },

    /// An error from the underlying I/O system.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::syntax(3, "Expected '.'");
        assert_eq!(err.to_string(), "invalid turtle at line 3: Expected '.'");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
