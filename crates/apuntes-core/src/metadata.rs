//! Metadata API seam
//!
//! Document records live in a separate service from the object bytes. The pipeline
//! only needs to create a record and read one back; the HTTP client in
//! `apuntes-api-client` implements this trait, tests use an in-memory mock.

use async_trait::async_trait;

use crate::models::{Document, NewDocument};

#[derive(Debug, Clone, thiserror::Error)]
pub enum MetadataError {
    /// Backend reachable but refused the request (4xx/5xx)
    #[error("Metadata API rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Credential missing, expired, or lacking permission
    #[error("Metadata API unauthorized: {0}")]
    Unauthorized(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    /// Backend could not be reached
    #[error("Metadata API unreachable: {0}")]
    Unreachable(String),

    /// Backend answered with something that is not a document
    #[error("Invalid metadata API response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait DocumentMetadataApi: Send + Sync {
    /// Create a document record. A single-row insert on the backend side.
    async fn create_document(
        &self,
        token: &str,
        document: &NewDocument,
    ) -> Result<Document, MetadataError>;

    /// Fetch a document record by id
    async fn get_document(&self, token: &str, id: &str) -> Result<Document, MetadataError>;
}
