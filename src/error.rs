//! Error types for todod
//!
//! HTTP status classes per the API contract:
//! - 400: validation failure, rejected before any store access
//! - 401: no resolved identity (fail closed)
//! - 403: record exists but is owned by someone else
//! - 404: identifier does not resolve to any record
//! - 500: store/upstream failure, surfaced rather than swallowed

use std::path::PathBuf;
use thiserror::Error;

/// HTTP status codes used by the error taxonomy
pub mod status {
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
    pub const INTERNAL: u16 = 500;
}

/// Main error type for todod operations
#[derive(Error, Debug)]
pub enum Error {
    // Validation failures (400). The payload is the client-facing message,
    // verbatim.
    #[error("{0}")]
    Validation(String),

    // Identity failures (401)
    #[error("Not authenticated")]
    Unauthenticated,

    // Authorization failures (403). Deliberately terse: the body must not
    // reveal anything about the record beyond the refusal itself.
    #[error("Not authorized")]
    Forbidden,

    // Missing records (404)
    #[error("Todo not found: {0}")]
    TodoNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    // Store and upstream failures (500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Attachment storage failed: {0}")]
    AttachmentFailed(String),
}

impl Error {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => status::BAD_REQUEST,
            Error::Unauthenticated => status::UNAUTHORIZED,
            Error::Forbidden => status::FORBIDDEN,
            Error::TodoNotFound(_) | Error::CategoryNotFound(_) => status::NOT_FOUND,
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::LockFailed(_)
            | Error::AttachmentFailed(_) => status::INTERNAL,
        }
    }
}

/// Result type alias for todod operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wire shape of an error response body
#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        ErrorBody {
            message: err.to_string(),
        }
    }
}
