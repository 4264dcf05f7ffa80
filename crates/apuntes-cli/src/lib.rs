//! Helpers shared by the `apuntes` binary.

use std::path::Path;

use anyhow::{Context, Result};
use apuntes_core::models::{UploadCandidate, UserContext};
use apuntes_core::{ErrorMetadata, ValidationError};
use apuntes_services::SubmissionState;

pub const OWNER_ID_VAR: &str = "APUNTES_OWNER_ID";
pub const TOKEN_VAR: &str = "APUNTES_TOKEN";

/// Identity of the CLI user, read from `APUNTES_OWNER_ID` and `APUNTES_TOKEN`.
///
/// A missing token is not an error here; the coordinator refuses to submit without one.
pub fn user_from_lookup<F>(lookup: F) -> Result<UserContext>
where
    F: Fn(&str) -> Option<String>,
{
    let owner_id = lookup(OWNER_ID_VAR)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("{} is not set", OWNER_ID_VAR))?;
    let token = lookup(TOKEN_VAR).filter(|v| !v.trim().is_empty());
    Ok(UserContext::new(owner_id.trim(), token))
}

/// Read a file into an upload candidate. The content type is left for the
/// pipeline to infer from the extension.
///
/// Files larger than `max_size` bytes are refused before being read.
pub fn read_candidate(path: &Path, max_size: usize) -> Result<UploadCandidate> {
    let len = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();
    let size = usize::try_from(len).unwrap_or(usize::MAX);
    if size > max_size {
        return Err(ValidationError::FileTooLarge {
            size,
            max: max_size,
        }
        .into());
    }

    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(UploadCandidate::new(data, filename, ""))
}

/// One-line progress message for a submission state
pub fn describe_state(state: &SubmissionState) -> String {
    match state {
        SubmissionState::Idle => "idle".to_string(),
        SubmissionState::Validating => "validating submission".to_string(),
        SubmissionState::KeyDerivation => "deriving object key".to_string(),
        SubmissionState::Uploading => "uploading file".to_string(),
        SubmissionState::Verifying => "verifying upload".to_string(),
        SubmissionState::PersistingMetadata => "saving note".to_string(),
        SubmissionState::Done(document) => format!("done: note {}", document.id),
        SubmissionState::Failed(err) => match err.suggested_action() {
            Some(action) => format!("failed: {} ({})", err.client_message(), action),
            None => format!("failed: {}", err.client_message()),
        },
    }
}
