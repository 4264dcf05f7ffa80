//! Error types module
//!
//! `AppError` is the failure reason the submission coordinator exposes to its caller.
//! Lower layers keep their own error types (`StorageError`, `MetadataError`,
//! `UploadFailedError`) carrying attempt counts and underlying causes for logging;
//! those are folded into an `AppError` at the coordinator boundary.

use crate::metadata::MetadataError;
use crate::validation::ValidationError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable or user-visible degraded outcomes
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented and logged
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UPLOAD_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether submitting again may succeed without the user changing anything
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upload failed after {attempts} attempt(s): {message}")]
    UploadFailed { attempts: u32, message: String },

    #[error("Object {storage_key} was uploaded but its metadata record could not be created: {reason}")]
    OrphanedObject {
        storage_key: String,
        storage_url: String,
        reason: String,
    },

    #[error("Submission cancelled")]
    Cancelled,

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<MetadataError> for AppError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::Unauthorized(msg) => AppError::Unauthorized(msg),
            MetadataError::NotFound(id) => AppError::NotFound(id),
            other => AppError::Metadata(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(ValidationError::InvalidMetadata(err.to_string()))
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        AppError::Validation(_) => (
            "VALIDATION_ERROR",
            false,
            Some("Check the title, format and file, then submit again"),
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            "UNAUTHORIZED",
            false,
            Some("Sign in again"),
            LogLevel::Debug,
        ),
        AppError::UploadFailed { .. } => (
            "UPLOAD_FAILED",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        AppError::OrphanedObject { .. } => (
            "ORPHANED_OBJECT",
            true,
            Some("Submit the note again; the uploaded file stays in storage without a note"),
            LogLevel::Error,
        ),
        AppError::Cancelled => ("CANCELLED", true, None, LogLevel::Debug),
        AppError::SubmissionInProgress => (
            "SUBMISSION_IN_PROGRESS",
            true,
            Some("Wait for the current submission to finish"),
            LogLevel::Debug,
        ),
        AppError::Metadata(_) => (
            "METADATA_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        AppError::NotFound(_) => (
            "NOT_FOUND",
            false,
            Some("Verify the document ID exists"),
            LogLevel::Debug,
        ),
        AppError::Storage(_) => (
            "STORAGE_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        AppError::Config(_) => (
            "CONFIG_ERROR",
            false,
            Some("Check the environment configuration"),
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error output
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::UploadFailed { .. } => "UploadFailed",
            AppError::OrphanedObject { .. } => "OrphanedObject",
            AppError::Cancelled => "Cancelled",
            AppError::SubmissionInProgress => "SubmissionInProgress",
            AppError::Metadata(_) => "Metadata",
            AppError::NotFound(_) => "NotFound",
            AppError::Storage(_) => "Storage",
            AppError::Config(_) => "Config",
            AppError::Internal(_) => "Internal",
        }
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(ref err) => err.to_string(),
            AppError::Unauthorized(_) => "You need to be signed in to submit notes".to_string(),
            AppError::UploadFailed { .. } => "The file could not be uploaded".to_string(),
            AppError::OrphanedObject { .. } => {
                "The file was uploaded but the note could not be saved".to_string()
            }
            AppError::Cancelled => "The submission was cancelled".to_string(),
            AppError::SubmissionInProgress => {
                "A note is already being submitted".to_string()
            }
            AppError::Metadata(_) => "Failed to save the note".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::Config(_) | AppError::Internal(_) => "Internal error".to_string(),
        }
    }
}
