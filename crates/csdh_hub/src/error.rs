//! Error types for the hub API server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// A specialized `Result` type for hub operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type for all operations within the hub.
#[derive(Debug, Error)]
pub enum Error {
    /// A required request parameter was absent.
    #[error("{0}")]
    MissingParameter(String),

    /// A path tried to escape the dataset root.
    #[error("Access to '{0}' is not allowed")]
    Forbidden(String),

    /// The feature invoked is switched off or not set up for this request.
    #[error("{0}")]
    NotConfigured(String),

    /// The dataset file type has no adapter.
    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    /// A SPARQL endpoint answered with a non-success status.
    #[error("SPARQL endpoint returned {status}: {body}")]
    Sparql { status: u16, body: String },

    /// A URI given by a client is not a usable IRI.
    #[error("'{0}' is not a valid IRI")]
    InvalidUri(String),

    /// A URI could not be dereferenced into the store.
    #[error("Could not resolve <{0}>")]
    Unresolved(String),

    /// No upstream source could be reached.
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// An error originating from the RDF layer.
    #[error("RDF error: {0}")]
    Rdf(#[from] csdh_rdf::Error),

    /// An error from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An error from the source repository.
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// A dataset file could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An error from the underlying I/O system.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred during data serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An unexpected internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status, or the OS error number for I/O failures.
    pub code: i64,
}

impl Error {
    /// Returns the HTTP status code for this error.
    ///
    /// Everything is a 500 except errors that carry their own HTTP status.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The numeric `code` reported to clients.
    pub fn code(&self) -> i64 {
        match self {
            Error::Io(err) => err
                .raw_os_error()
                .map(i64::from)
                .unwrap_or_else(|| i64::from(self.status_code().as_u16())),
            _ => i64::from(self.status_code().as_u16()),
        }
    }

    /// Returns a machine-readable error kind, used in logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::MissingParameter(_) => "MISSING_PARAMETER",
            Error::Forbidden(_) => "FORBIDDEN",
            Error::NotConfigured(_) => "NOT_CONFIGURED",
            Error::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Error::Sparql { .. } => "SPARQL_ERROR",
            Error::InvalidUri(_) => "INVALID_URI",
            Error::Unresolved(_) => "UNRESOLVED",
            Error::Unavailable(_) => "UNAVAILABLE",
            Error::Rdf(_) => "RDF_ERROR",
            Error::Http(_) => "HTTP_ERROR",
            Error::Git(_) => "GIT_ERROR",
            Error::Csv(_) => "CSV_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.error_code(), "{}", self);
        } else {
            tracing::warn!(kind = self.error_code(), "{}", self);
        }

        let body = ErrorResponse {
            message: self.to_string(),
            code: self.code(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(format!("Background task failed: {}", err))
    }
}
