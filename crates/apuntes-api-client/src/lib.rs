//! HTTP client for the apuntes metadata API.
//!
//! Document records live behind `POST /documents` and `GET /documents/{id}`. Every
//! call carries the caller's bearer token; the client itself holds no credentials.
//! `ApiClient` implements `DocumentMetadataApi` so the submission coordinator and
//! the rendering dispatcher can use it directly.

use anyhow::{Context, Result};
use apuntes_core::models::{Document, NewDocument};
use apuntes_core::{Config, DocumentMetadataApi, MetadataError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// HTTP client for the metadata API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.metadata_api_url().to_string())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        request.header("Authorization", format!("Bearer {}", token))
    }

    /// Send a request and deserialize a JSON success body
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        not_found: &str,
    ) -> Result<T, MetadataError> {
        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, base_url = %self.base_url, "Metadata API unreachable");
            MetadataError::Unreachable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = status.as_u16(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Metadata API request failed"
            );
            return Err(map_status(status, not_found, error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MetadataError::Unreachable(e.to_string()))?;
        let parsed = serde_json::from_str::<T>(&body)
            .map_err(|e| MetadataError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            status = status.as_u16(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Metadata API request succeeded"
        );
        Ok(parsed)
    }
}

fn map_status(status: StatusCode, not_found: &str, message: String) -> MetadataError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MetadataError::Unauthorized(message),
        StatusCode::NOT_FOUND => MetadataError::NotFound(not_found.to_string()),
        status => MetadataError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl DocumentMetadataApi for ApiClient {
    async fn create_document(
        &self,
        token: &str,
        document: &NewDocument,
    ) -> Result<Document, MetadataError> {
        let request = self
            .client
            .post(self.build_url("/documents"))
            .json(document);
        self.send_json(Self::authorize(request, token), "/documents")
            .await
    }

    async fn get_document(&self, token: &str, id: &str) -> Result<Document, MetadataError> {
        let path = format!("/documents/{}", urlencoding::encode(id));
        let request = self.client.get(self.build_url(&path));
        self.send_json(Self::authorize(request, token), id).await
    }
}
