//! Apuntes Services Library
//!
//! The note ingestion and serving pipeline:
//! - `uploader`: bounded retries with exponential backoff around a single put
//! - `verifier`: best-effort visibility probe after upload
//! - `submission`: the coordinator sequencing validation, key derivation, upload,
//!   verification and metadata creation
//! - `render`: format-dispatched rendering of persisted documents

pub mod render;
pub mod submission;
pub mod uploader;
pub mod verifier;

#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used types
pub use render::{clean_storage_url, Rendered, RenderingDispatcher};
pub use submission::{NoteSubmission, SubmissionCoordinator, SubmissionState};
pub use uploader::{
    classify_storage_error, RetryingUploader, UploadAttempt, UploadError, UploadFailedError,
    UploadReport,
};
pub use verifier::{ConsistencyVerifier, VerificationOutcome};
