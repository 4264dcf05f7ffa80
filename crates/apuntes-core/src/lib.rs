//! Apuntes Core Library
//!
//! This crate provides the domain models, error types, configuration, and validation
//! shared by every component of the note ingestion and serving pipeline.

pub mod config;
pub mod constants;
pub mod error;
pub mod metadata;
pub mod models;
pub mod retry_class;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use metadata::{DocumentMetadataApi, MetadataError};
pub use retry_class::RetryClass;
pub use storage_types::StorageBackend;
pub use validation::{UploadPolicy, ValidationError};
