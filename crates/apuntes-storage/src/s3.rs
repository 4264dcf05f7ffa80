use crate::keys::{public_object_url, ObjectKey};
use crate::traits::{ObjectStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload, RetryConfig,
};
use std::time::Instant;

/// S3 storage implementation
///
/// Works against AWS and S3-compatible providers. Requests go out path-style
/// and the client's built-in retries are disabled: one `put_object` is one PUT.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_base_url` - Root used for public object URLs
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: String,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env().with_region(region);

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        Self::from_builder(builder, bucket, public_base_url)
    }

    /// Finish a builder that already carries region, endpoint and credentials
    pub(crate) fn from_builder(
        builder: AmazonS3Builder,
        bucket: String,
        public_base_url: String,
    ) -> StorageResult<Self> {
        let retry = RetryConfig {
            max_retries: 0,
            ..Default::default()
        };

        let store = builder
            .with_bucket_name(bucket.clone())
            .with_virtual_hosted_style_request(false)
            .with_retry(retry)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Fold object_store errors into the storage error categories
pub(crate) fn map_object_store_error(err: ObjectStoreError) -> StorageError {
    match err {
        ObjectStoreError::NotFound { path, .. } => StorageError::Client {
            status: 404,
            message: format!("object not found: {}", path),
        },
        ObjectStoreError::PermissionDenied { path, .. } => StorageError::Client {
            status: 403,
            message: format!("permission denied: {}", path),
        },
        ObjectStoreError::Unauthenticated { path, .. } => StorageError::Client {
            status: 401,
            message: format!("unauthenticated: {}", path),
        },
        e @ (ObjectStoreError::Precondition { .. }
        | ObjectStoreError::AlreadyExists { .. }
        | ObjectStoreError::NotModified { .. }) => StorageError::Client {
            status: 412,
            message: e.to_string(),
        },
        e @ (ObjectStoreError::InvalidPath { .. } | ObjectStoreError::NotSupported { .. }) => {
            StorageError::MalformedRequest(e.to_string())
        }
        e => match status_in_chain(&e) {
            Some(status) => StorageError::from_status(status, e.to_string()),
            None => StorageError::Transport(e.to_string()),
        },
    }
}

/// HTTP status of a rejected request, if any error in the chain reports one.
///
/// object_store folds statuses it has no variant for (400, 413, 429, 5xx) into
/// `Generic`; the status survives only in the message of the inner request error.
fn status_in_chain(err: &(dyn std::error::Error + 'static)) -> Option<u16> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(status) = parse_status(&e.to_string()) {
            return Some(status);
        }
        current = e.source();
    }
    None
}

fn parse_status(message: &str) -> Option<u16> {
    const MARKER: &str = "status code: ";
    let start = message.find(MARKER)? + MARKER.len();
    let digits: String = message[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits
        .parse::<u16>()
        .ok()
        .filter(|status| (400..600).contains(status))
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let size = data.len();
        let location = Path::parse(key.as_str())
            .map_err(|e| StorageError::InvalidKey(e.to_string()))?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = Instant::now();

        self.store
            .put_opts(&location, PutPayload::from(data), opts)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                map_object_store_error(e)
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn exists(&self, key: &ObjectKey) -> StorageResult<bool> {
        let location = Path::parse(key.as_str())
            .map_err(|e| StorageError::InvalidKey(e.to_string()))?;

        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(map_object_store_error(e)),
        }
    }

    fn public_url(&self, key: &ObjectKey) -> String {
        public_object_url(&self.public_base_url, &self.bucket, key)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
