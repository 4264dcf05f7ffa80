//! Retrying uploader
//!
//! Drives `ObjectStorage::put_object` through a bounded retry policy. Attempts are
//! strictly sequential and every retry writes the same key.

use std::sync::Arc;
use std::time::{Duration, Instant};

use apuntes_core::retry_class::AttemptOutcome;
use apuntes_core::RetryClass;
use apuntes_infra::{sleep_cancellable, RetryPolicy, Sleeper};
use apuntes_storage::{ObjectKey, ObjectStorage, StorageError, StorageErrorKind};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

/// One entry of the uploader's attempt log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAttempt {
    /// 1-based
    pub attempt_number: u32,
    pub outcome: AttemptOutcome,
    /// Delay slept before this attempt (zero for the first)
    pub backoff_delay_applied: Duration,
}

/// Successful upload
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub attempts: Vec<UploadAttempt>,
}

impl UploadReport {
    pub fn attempt_count(&self) -> u32 {
        self.attempts.len() as u32
    }
}

/// Upload gave up: retries exhausted or a fatal error short-circuited the loop
#[derive(Debug, Clone, thiserror::Error)]
#[error("upload failed after {attempts} attempt(s): {last_error}")]
pub struct UploadFailedError {
    pub attempts: u32,
    pub last_error: StorageError,
    pub log: Vec<UploadAttempt>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Failed(#[from] UploadFailedError),

    #[error("upload cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
}

/// Transport and 5xx failures are worth retrying; 4xx and malformed requests are not.
pub fn classify_storage_error(err: &StorageError) -> RetryClass {
    match err.kind() {
        StorageErrorKind::Transport | StorageErrorKind::Server => RetryClass::Retryable,
        StorageErrorKind::Client | StorageErrorKind::Malformed => RetryClass::Fatal,
    }
}

#[derive(Clone)]
pub struct RetryingUploader {
    storage: Arc<dyn ObjectStorage>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryingUploader {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            storage,
            policy,
            sleeper,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Upload `data` under `key`, retrying transient failures.
    ///
    /// Cancelling `cancel` stops a pending backoff sleep or in-flight put.
    pub async fn upload(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
        cancel: &CancellationToken,
    ) -> Result<UploadReport, UploadError> {
        let start = Instant::now();
        let mut log = Vec::new();
        let mut attempt: u32 = 1;
        let mut delay = Duration::ZERO;

        loop {
            if cancel.is_cancelled() {
                return Err(UploadError::Cancelled {
                    attempts: attempt - 1,
                });
            }

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(key = %key, attempt = attempt, "Upload cancelled in flight");
                    return Err(UploadError::Cancelled { attempts: attempt });
                }
                result = self.storage.put_object(key, data.clone(), content_type) => result,
            };

            let err = match result {
                Ok(()) => {
                    log.push(UploadAttempt {
                        attempt_number: attempt,
                        outcome: AttemptOutcome::Success,
                        backoff_delay_applied: delay,
                    });
                    tracing::info!(
                        key = %key,
                        attempts = attempt,
                        size_bytes = data.len(),
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Upload completed"
                    );
                    return Ok(UploadReport { attempts: log });
                }
                Err(err) => err,
            };

            let class = classify_storage_error(&err);
            log.push(UploadAttempt {
                attempt_number: attempt,
                outcome: class.into(),
                backoff_delay_applied: delay,
            });

            if !class.is_retryable() || !self.policy.allows_retry(attempt) {
                tracing::error!(
                    key = %key,
                    attempts = attempt,
                    retry_class = %class,
                    error = %err,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Upload failed"
                );
                return Err(UploadFailedError {
                    attempts: attempt,
                    last_error: err,
                    log,
                }
                .into());
            }

            delay = self.policy.backoff(attempt);
            tracing::warn!(
                key = %key,
                attempt = attempt,
                max_attempts = self.policy.max_attempts,
                backoff_ms = delay.as_millis() as u64,
                error = %err,
                "Upload attempt failed, retrying"
            );

            if !sleep_cancellable(self.sleeper.as_ref(), delay, cancel).await {
                tracing::info!(key = %key, attempt = attempt, "Upload cancelled during backoff");
                return Err(UploadError::Cancelled { attempts: attempt });
            }
            attempt += 1;
        }
    }
}
