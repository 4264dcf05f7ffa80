use std::sync::Arc;
use std::time::{Duration, Instant};

use apuntes_core::models::{
    Document, DocumentFormat, NewDocument, UploadCandidate, UserContext, Visibility,
};
use apuntes_core::validation::resolve_content_type;
use apuntes_core::{AppError, Config, DocumentMetadataApi, UploadPolicy, ValidationError};
use apuntes_infra::{RetryPolicy, Sleeper, TokioSleeper};
use apuntes_storage::{generate_object_key, ObjectKey, ObjectStorage};
use bytes::Bytes;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use validator::Validate;

use super::state::SubmissionState;
use crate::uploader::{RetryingUploader, UploadError};
use crate::verifier::{ConsistencyVerifier, VerificationOutcome};

/// Form fields and file collected by the caller
#[derive(Debug, Clone)]
pub struct NoteSubmission {
    pub title: String,
    pub format: Option<DocumentFormat>,
    pub visibility: Visibility,
    pub associated_challenge_id: Option<String>,
    pub associated_plan_id: Option<String>,
    pub content: Option<String>,
    pub file: Option<UploadCandidate>,
}

/// Inputs that passed validation, ready for key derivation
struct ValidatedSubmission {
    token: String,
    file: UploadCandidate,
    extension: String,
    draft: NewDocument,
}

/// Sequences one note submission end to end.
///
/// The object is always uploaded before its metadata record is created. If the
/// record cannot be created afterwards the object is left in place and the
/// submission fails with `AppError::OrphanedObject`.
pub struct SubmissionCoordinator {
    storage: Arc<dyn ObjectStorage>,
    metadata: Arc<dyn DocumentMetadataApi>,
    policy: UploadPolicy,
    retry: RetryPolicy,
    settle_delay: Duration,
    uploader: RetryingUploader,
    verifier: ConsistencyVerifier,
    state_tx: watch::Sender<SubmissionState>,
    in_flight: Mutex<()>,
}

impl SubmissionCoordinator {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        metadata: Arc<dyn DocumentMetadataApi>,
        policy: UploadPolicy,
        retry: RetryPolicy,
        settle_delay: Duration,
    ) -> Self {
        let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
        let (state_tx, _) = watch::channel(SubmissionState::Idle);

        Self {
            uploader: RetryingUploader::new(storage.clone(), retry, sleeper.clone()),
            verifier: ConsistencyVerifier::new(storage.clone(), sleeper, settle_delay),
            storage,
            metadata,
            policy,
            retry,
            settle_delay,
            state_tx,
            in_flight: Mutex::new(()),
        }
    }

    pub fn from_config(
        config: &Config,
        storage: Arc<dyn ObjectStorage>,
        metadata: Arc<dyn DocumentMetadataApi>,
    ) -> Self {
        Self::new(
            storage,
            metadata,
            config.upload_policy(),
            RetryPolicy::from_config(config),
            config.verify_settle_delay(),
        )
    }

    /// Replace the sleeper used for backoff and the settle delay
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.uploader = RetryingUploader::new(self.storage.clone(), self.retry, sleeper.clone());
        self.verifier = ConsistencyVerifier::new(self.storage.clone(), sleeper, self.settle_delay);
        self
    }

    /// Watch state transitions. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> SubmissionState {
        self.state_tx.borrow().clone()
    }

    /// Run one submission to completion.
    ///
    /// Refused with `SubmissionInProgress` while another submission is running.
    pub async fn submit(
        &self,
        user: &UserContext,
        submission: NoteSubmission,
        cancel: &CancellationToken,
    ) -> Result<Document, AppError> {
        let _guard = self.in_flight.try_lock().map_err(|_| {
            tracing::debug!(owner_id = %user.owner_id, "Submission refused, another one is in flight");
            AppError::SubmissionInProgress
        })?;

        let start = Instant::now();
        let result = self.run(user, submission, cancel).await;

        match &result {
            Ok(document) => {
                tracing::info!(
                    document_id = %document.id,
                    owner_id = %user.owner_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Note submitted"
                );
                self.transition(SubmissionState::Done(document.clone()), None);
            }
            Err(err) => {
                tracing::warn!(
                    owner_id = %user.owner_id,
                    error_type = err.error_type(),
                    error = %err,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Note submission failed"
                );
                self.transition(SubmissionState::Failed(err.clone()), None);
            }
        }

        result
    }

    async fn run(
        &self,
        user: &UserContext,
        submission: NoteSubmission,
        cancel: &CancellationToken,
    ) -> Result<Document, AppError> {
        self.transition(SubmissionState::Validating, None);
        let validated = self.validate(user, submission)?;

        self.transition(SubmissionState::KeyDerivation, None);
        let key = generate_object_key(
            &user.owner_id,
            &validated.draft.title,
            &validated.file.original_filename,
        )?;
        let content_type = resolve_content_type(&validated.file.content_type, &validated.extension);

        self.transition(SubmissionState::Uploading, Some(&key));
        let report = self
            .uploader
            .upload(&key, Bytes::from(validated.file.data), &content_type, cancel)
            .await
            .map_err(|e| match e {
                UploadError::Failed(failed) => AppError::UploadFailed {
                    attempts: failed.attempts,
                    message: failed.last_error.to_string(),
                },
                UploadError::Cancelled { .. } => AppError::Cancelled,
            })?;
        let storage_url = self.storage.public_url(&key);
        tracing::debug!(key = %key, attempts = report.attempt_count(), "Object stored");

        self.transition(SubmissionState::Verifying, Some(&key));
        if self.verifier.verify(&key, cancel).await == VerificationOutcome::Cancelled {
            return Err(AppError::Cancelled);
        }

        self.transition(SubmissionState::PersistingMetadata, Some(&key));
        let new_document = NewDocument {
            storage_url: Some(storage_url.clone()),
            ..validated.draft
        };

        let created = tokio::select! {
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            created = self.metadata.create_document(&validated.token, &new_document) => created,
        };

        created.map_err(|e| {
            tracing::error!(
                key = %key,
                storage_url = %storage_url,
                error = %e,
                "Metadata record not created, object left orphaned"
            );
            AppError::OrphanedObject {
                storage_key: key.to_string(),
                storage_url,
                reason: e.to_string(),
            }
        })
    }

    /// Checks that need no network: form fields, credential, file policy
    fn validate(
        &self,
        user: &UserContext,
        submission: NoteSubmission,
    ) -> Result<ValidatedSubmission, AppError> {
        let title = submission.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        let format = submission.format.ok_or(ValidationError::MissingFormat)?;
        let file = submission.file.ok_or(ValidationError::MissingFile)?;

        let token = user
            .bearer()
            .ok_or_else(|| AppError::Unauthorized("no bearer credential".to_string()))?
            .to_string();

        let extension = self.policy.validate(format, &file)?;

        let draft = NewDocument {
            title,
            format: Some(format),
            visibility: submission.visibility,
            associated_challenge_id: non_blank(submission.associated_challenge_id),
            associated_plan_id: non_blank(submission.associated_plan_id),
            free_text_content: non_blank(submission.content),
            storage_url: None,
        };
        draft.validate()?;

        Ok(ValidatedSubmission {
            token,
            file,
            extension,
            draft,
        })
    }

    fn transition(&self, state: SubmissionState, key: Option<&ObjectKey>) {
        match key {
            Some(key) => tracing::debug!(state = %state, key = %key, "Submission state changed"),
            None => tracing::debug!(state = %state, "Submission state changed"),
        }
        self.state_tx.send_replace(state);
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
