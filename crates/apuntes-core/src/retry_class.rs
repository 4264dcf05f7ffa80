//! Retry classification
//!
//! Failures below the submission coordinator are sorted into two buckets: those
//! worth another attempt and those that will fail the same way every time.

use std::fmt;

/// Whether a failed operation may be attempted again
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryClass {
    /// Transient failure (network, server 5xx). Another attempt may succeed.
    Retryable,
    /// Permanent failure (auth, bad request, payload too large). Retrying is pointless.
    Fatal,
}

impl RetryClass {
    pub fn is_retryable(self) -> bool {
        matches!(self, RetryClass::Retryable)
    }
}

impl fmt::Display for RetryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryClass::Retryable => write!(f, "retryable"),
            RetryClass::Fatal => write!(f, "fatal"),
        }
    }
}

/// Outcome of a single attempt, as recorded by a retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    RetryableFailure,
    FatalFailure,
}

impl From<RetryClass> for AttemptOutcome {
    fn from(class: RetryClass) -> Self {
        match class {
            RetryClass::Retryable => AttemptOutcome::RetryableFailure,
            RetryClass::Fatal => AttemptOutcome::FatalFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(RetryClass::Retryable.is_retryable());
        assert!(!RetryClass::Fatal.is_retryable());
    }

    #[test]
    fn test_outcome_from_class() {
        assert_eq!(
            AttemptOutcome::from(RetryClass::Retryable),
            AttemptOutcome::RetryableFailure
        );
        assert_eq!(
            AttemptOutcome::from(RetryClass::Fatal),
            AttemptOutcome::FatalFailure
        );
    }
}
