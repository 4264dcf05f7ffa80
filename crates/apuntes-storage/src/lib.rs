//! Apuntes Storage Library
//!
//! This crate provides the object storage abstraction used by the note pipeline:
//! the `ObjectStorage` trait, the object key generator, and the HTTP (storage REST)
//! and S3 backends.
//!
//! # Object key format
//!
//! `{owner_id}/{title_slug}_{random}.{extension}`. The slug only contains `[a-z0-9_]`,
//! the random component is 32 lowercase hex characters. Keys must not contain `..`
//! or a leading `/`. Key generation is centralized in the `keys` module so all
//! backends stay consistent.
//!
//! # Public URLs
//!
//! Every backend exposes objects as `{public_base}/object/public/{bucket}/{key}`.

pub mod factory;
#[cfg(feature = "storage-http")]
pub mod http;
pub mod keys;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use apuntes_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-http")]
pub use http::HttpStorage;
pub use keys::{generate_object_key, generate_object_key_with, ObjectKey};
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageErrorKind, StorageResult};
