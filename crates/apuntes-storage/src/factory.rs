#[cfg(feature = "storage-http")]
use crate::HttpStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{ObjectStorage, StorageBackend, StorageError, StorageResult};
use apuntes_core::Config;
use std::sync::Arc;

fn required_bucket(config: &Config) -> StorageResult<String> {
    config
        .storage_bucket()
        .map(String::from)
        .ok_or_else(|| StorageError::ConfigError("STORAGE_BUCKET not configured".to_string()))
}

/// Create a storage backend based on configuration
pub fn create_storage(config: &Config) -> StorageResult<Arc<dyn ObjectStorage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-http")]
        StorageBackend::Http => {
            let bucket = required_bucket(config)?;
            let base_url = config.storage_base_url().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("STORAGE_BASE_URL not configured".to_string())
            })?;
            let public_url = config.storage_public_url().map(String::from);
            let token = config.storage_access_token().map(String::from);

            let storage = HttpStorage::new(base_url, public_url, bucket, token)?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-http"))]
        StorageBackend::Http => Err(StorageError::ConfigError(
            "HTTP storage backend not available (storage-http feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = required_bucket(config)?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint().map(String::from);
            let public_url = config.storage_public_url().map(String::from).ok_or_else(|| {
                StorageError::ConfigError(
                    "STORAGE_PUBLIC_URL or STORAGE_BASE_URL not configured".to_string(),
                )
            })?;

            let storage = S3Storage::new(bucket, region, endpoint, public_url)?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),
    }
}
