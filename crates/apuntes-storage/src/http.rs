use crate::keys::{encode_key_path, public_object_url, ObjectKey};
use crate::traits::{ObjectStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::{Duration, Instant};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Storage REST backend
///
/// Objects are written with `PUT {base}/object/{bucket}/{key}` and probed with a
/// `HEAD` on their public URL.
#[derive(Clone)]
pub struct HttpStorage {
    client: reqwest::Client,
    base_url: String,
    public_base_url: String,
    bucket: String,
    access_token: Option<String>,
}

impl HttpStorage {
    /// Create a new HttpStorage instance
    ///
    /// # Arguments
    /// * `base_url` - Storage API root, e.g. `https://project.example.com/storage/v1`
    /// * `public_base_url` - Root used for public object URLs, defaults to `base_url`
    /// * `bucket` - Bucket name
    /// * `access_token` - Bearer token sent on writes
    pub fn new(
        base_url: String,
        public_base_url: Option<String>,
        bucket: String,
        access_token: Option<String>,
    ) -> StorageResult<Self> {
        if bucket.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "STORAGE_BUCKET not configured".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let public_base_url = public_base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| base_url.clone());

        Ok(Self {
            client,
            base_url,
            public_base_url,
            bucket,
            access_token,
        })
    }

    fn object_url(&self, key: &ObjectKey) -> String {
        format!(
            "{}/object/{}/{}",
            self.base_url,
            self.bucket,
            encode_key_path(key)
        )
    }
}

fn map_send_error(err: reqwest::Error) -> StorageError {
    if err.is_builder() {
        StorageError::MalformedRequest(err.to_string())
    } else {
        StorageError::Transport(err.to_string())
    }
}

#[async_trait]
impl ObjectStorage for HttpStorage {
    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let size = data.len();
        let start = Instant::now();

        let mut request = self
            .client
            .put(self.object_url(key))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(data);
        if let Some(ref token) = self.access_token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Storage upload request failed"
            );
            map_send_error(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Storage upload rejected"
            );
            return Err(StorageError::from_status(status.as_u16(), body));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage upload successful"
        );

        Ok(())
    }

    async fn exists(&self, key: &ObjectKey) -> StorageResult<bool> {
        let response = self
            .client
            .head(self.public_url(key))
            .send()
            .await
            .map_err(map_send_error)?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(StorageError::from_status(
                status.as_u16(),
                format!("existence probe for {} failed", key),
            )),
        }
    }

    fn public_url(&self, key: &ObjectKey) -> String {
        public_object_url(&self.public_base_url, &self.bucket, key)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Http
    }
}
