use std::fmt;

use apuntes_core::models::Document;
use apuntes_core::AppError;

/// Observable stage of a submission.
///
/// `Failed` is reachable from every stage before `Done`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Validating,
    KeyDerivation,
    Uploading,
    Verifying,
    PersistingMetadata,
    Done(Document),
    Failed(AppError),
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Validating => "validating",
            SubmissionState::KeyDerivation => "key_derivation",
            SubmissionState::Uploading => "uploading",
            SubmissionState::Verifying => "verifying",
            SubmissionState::PersistingMetadata => "persisting_metadata",
            SubmissionState::Done(_) => "done",
            SubmissionState::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Done(_) | SubmissionState::Failed(_))
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
