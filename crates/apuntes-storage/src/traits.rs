//! Storage abstraction trait
//!
//! This module defines the `ObjectStorage` trait that all storage backends must implement.

use crate::keys::ObjectKey;
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
///
/// Variants are shaped so callers can tell transport failures and server-side
/// errors (worth retrying) from client errors and malformed requests (not worth
/// retrying). See [`StorageError::kind`].
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Storage unreachable: {0}")]
    Transport(String),

    #[error("Storage server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Storage rejected request with status {status}: {message}")]
    Client { status: u16, message: String },

    #[error("Malformed storage request: {0}")]
    MalformedRequest(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Coarse failure category of a [`StorageError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// Network failure, timeout, connection reset
    Transport,
    /// 5xx response
    Server,
    /// 4xx response
    Client,
    /// Request could not be built or the key/config is unusable
    Malformed,
}

impl StorageError {
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            StorageError::Transport(_) => StorageErrorKind::Transport,
            StorageError::Server { .. } => StorageErrorKind::Server,
            StorageError::Client { .. } => StorageErrorKind::Client,
            StorageError::MalformedRequest(_)
            | StorageError::InvalidKey(_)
            | StorageError::ConfigError(_) => StorageErrorKind::Malformed,
        }
    }

    /// HTTP status of the response, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            StorageError::Server { status, .. } | StorageError::Client { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Build an error from a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status >= 500 {
            StorageError::Server { status, message }
        } else {
            StorageError::Client { status, message }
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage abstraction
///
/// A single `put_object` call is exactly one request: backends never retry on
/// their own. Retry policy lives with the caller.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `key`, overwriting any previous object
    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Metadata-only probe: `Ok(false)` when the object is not (yet) visible
    async fn exists(&self, key: &ObjectKey) -> StorageResult<bool>;

    /// Publicly readable URL of the object
    fn public_url(&self, key: &ObjectKey) -> String;

    fn bucket(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
