//! Document submission
//!
//! `SubmissionCoordinator` sequences validation, key derivation, upload,
//! verification and metadata creation for one note at a time.

mod coordinator;
mod state;

pub use coordinator::{NoteSubmission, SubmissionCoordinator};
pub use state::SubmissionState;
