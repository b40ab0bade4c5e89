//! Error types module
//!
//! Every failure a request can hit is classified into exactly one `AppError` variant.
//! The variants mirror the stages of the submission pipeline: content-type
//! resolution, part reading, part decoding, identifier parsing, authentication,
//! lookups, and the persistence collaborator.
//!
//! `From<sqlx::Error>` is gated behind the `sqlx` feature.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like malformed client input
    Debug,
    /// Warning level - for credential problems worth noticing
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "MALFORMED_CONTENT_TYPE")
    fn error_code(&self) -> &'static str;

    /// Client-facing message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid content type: {0}")]
    MalformedContentType(String),

    #[error("malformed multipart part: {0}")]
    MalformedPart(String),

    #[error("failed to decode part: {0}")]
    DecodeFailure(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("authentication failure")]
    AuthenticationFailure,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage failure: {0}")]
    StorageFailure(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => AppError::NotFound("record not found".to_string()),
            other => AppError::StorageFailure(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::DecodeFailure(format!("invalid JSON metadata: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::MalformedContentType(_) => (400, "MALFORMED_CONTENT_TYPE", LogLevel::Debug),
        AppError::MalformedPart(_) => (400, "MALFORMED_PART", LogLevel::Debug),
        AppError::DecodeFailure(_) => (400, "DECODE_FAILURE", LogLevel::Debug),
        AppError::InvalidIdentifier(_) => (400, "INVALID_IDENTIFIER", LogLevel::Debug),
        AppError::AuthenticationFailure => (400, "AUTHENTICATION_FAILURE", LogLevel::Warn),
        AppError::NotFound(_) => (400, "NOT_FOUND", LogLevel::Debug),
        AppError::StorageFailure(_) => (400, "STORAGE_FAILURE", LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for logs
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MalformedContentType(_) => "MalformedContentType",
            AppError::MalformedPart(_) => "MalformedPart",
            AppError::DecodeFailure(_) => "DecodeFailure",
            AppError::InvalidIdentifier(_) => "InvalidIdentifier",
            AppError::AuthenticationFailure => "AuthenticationFailure",
            AppError::NotFound(_) => "NotFound",
            AppError::StorageFailure(_) => "StorageFailure",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
