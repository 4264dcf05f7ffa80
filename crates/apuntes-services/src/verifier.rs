//! Consistency verifier
//!
//! The backing store is eventually consistent, so a fresh object may not be
//! readable right away. After a settle delay the verifier probes once and logs
//! what it saw. The outcome is advisory: it never fails a submission.

use std::sync::Arc;
use std::time::Duration;

use apuntes_infra::{sleep_cancellable, Sleeper};
use apuntes_storage::{ObjectKey, ObjectStorage};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Visible,
    NotYetVisible,
    ProbeFailed(String),
    /// Cancellation arrived during the settle delay or the probe
    Cancelled,
}

#[derive(Clone)]
pub struct ConsistencyVerifier {
    storage: Arc<dyn ObjectStorage>,
    sleeper: Arc<dyn Sleeper>,
    settle_delay: Duration,
}

impl ConsistencyVerifier {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        sleeper: Arc<dyn Sleeper>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            storage,
            sleeper,
            settle_delay,
        }
    }

    pub async fn verify(&self, key: &ObjectKey, cancel: &CancellationToken) -> VerificationOutcome {
        if !sleep_cancellable(self.sleeper.as_ref(), self.settle_delay, cancel).await {
            return VerificationOutcome::Cancelled;
        }

        let probe = tokio::select! {
            _ = cancel.cancelled() => return VerificationOutcome::Cancelled,
            probe = self.storage.exists(key) => probe,
        };

        match probe {
            Ok(true) => {
                tracing::debug!(key = %key, "Uploaded object is visible");
                VerificationOutcome::Visible
            }
            Ok(false) => {
                tracing::warn!(
                    key = %key,
                    settle_delay_ms = self.settle_delay.as_millis() as u64,
                    "Uploaded object not yet visible, continuing"
                );
                VerificationOutcome::NotYetVisible
            }
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    error = %e,
                    "Visibility probe failed, continuing"
                );
                VerificationOutcome::ProbeFailed(e.to_string())
            }
        }
    }
}
