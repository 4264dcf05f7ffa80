//! Configuration module
//!
//! This module provides the configuration for the note pipeline: storage backend,
//! metadata API location, upload policy, retry and verification timings.

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_UPLOAD_SIZE_MB, DEFAULT_UPLOAD_BASE_DELAY_MS, DEFAULT_UPLOAD_MAX_ATTEMPTS,
    DEFAULT_UPLOAD_MAX_DELAY_MS, DEFAULT_VERIFY_SETTLE_DELAY_MS,
};
use crate::models::DocumentFormat;
use crate::storage_types::StorageBackend;
use crate::validation::UploadPolicy;

/// Base configuration shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub environment: String,
    /// `pretty` or `json`
    pub log_format: String,
}

/// Pipeline configuration
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub storage_base_url: Option<String>,
    /// Base for public object URLs; defaults to `storage_base_url`
    pub storage_public_url: Option<String>,
    pub storage_bucket: Option<String>,
    pub storage_access_token: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    // Metadata API
    pub metadata_api_url: String,
    // Upload policy
    pub max_upload_size_bytes: usize,
    pub pdf_allowed_extensions: Vec<String>,
    pub markdown_allowed_extensions: Vec<String>,
    pub docx_allowed_extensions: Vec<String>,
    // Retry and verification
    pub upload_max_attempts: u32,
    pub upload_base_delay_ms: u64,
    pub upload_max_delay_ms: u64,
    pub verify_settle_delay_ms: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PipelineConfig>);

impl Config {
    fn as_pipeline(&self) -> &PipelineConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.as_pipeline().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = PipelineConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_pipeline().validate()
    }

    pub fn environment(&self) -> &str {
        &self.as_pipeline().base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.as_pipeline().base.log_format
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_pipeline().storage_backend
    }

    pub fn storage_base_url(&self) -> Option<&str> {
        self.as_pipeline().storage_base_url.as_deref()
    }

    pub fn storage_public_url(&self) -> Option<&str> {
        self.as_pipeline()
            .storage_public_url
            .as_deref()
            .or_else(|| self.storage_base_url())
    }

    pub fn storage_bucket(&self) -> Option<&str> {
        self.as_pipeline().storage_bucket.as_deref()
    }

    pub fn storage_access_token(&self) -> Option<&str> {
        self.as_pipeline().storage_access_token.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_pipeline().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_pipeline().s3_endpoint.as_deref()
    }

    pub fn metadata_api_url(&self) -> &str {
        &self.as_pipeline().metadata_api_url
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_pipeline().max_upload_size_bytes
    }

    pub fn upload_max_attempts(&self) -> u32 {
        self.as_pipeline().upload_max_attempts
    }

    pub fn upload_base_delay(&self) -> Duration {
        Duration::from_millis(self.as_pipeline().upload_base_delay_ms)
    }

    pub fn upload_max_delay(&self) -> Duration {
        Duration::from_millis(self.as_pipeline().upload_max_delay_ms)
    }

    pub fn verify_settle_delay(&self) -> Duration {
        Duration::from_millis(self.as_pipeline().verify_settle_delay_ms)
    }

    /// Upload policy assembled from the per-format allow-lists and the size ceiling
    pub fn upload_policy(&self) -> UploadPolicy {
        let cfg = self.as_pipeline();
        UploadPolicy::new(cfg.max_upload_size_bytes)
            .with_extensions(DocumentFormat::Pdf, &cfg.pdf_allowed_extensions)
            .with_extensions(DocumentFormat::Markdown, &cfg.markdown_allowed_extensions)
            .with_extensions(DocumentFormat::Docx, &cfg.docx_allowed_extensions)
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl PipelineConfig {
    /// Build from a variable lookup. `Config::from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let storage_backend = match non_empty("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::Http,
        };

        let max_upload_size_mb = get_or("MAX_UPLOAD_SIZE_MB", &DEFAULT_MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE_MB);

        let config = PipelineConfig {
            base: BaseConfig {
                environment,
                log_format: get_or("LOG_FORMAT", "pretty").to_lowercase(),
            },
            storage_backend,
            storage_base_url: non_empty("STORAGE_BASE_URL"),
            storage_public_url: non_empty("STORAGE_PUBLIC_URL"),
            storage_bucket: non_empty("STORAGE_BUCKET"),
            storage_access_token: non_empty("STORAGE_ACCESS_TOKEN"),
            s3_region: non_empty("S3_REGION").or_else(|| non_empty("AWS_REGION")),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            metadata_api_url: get_or("METADATA_API_URL", "http://localhost:3000"),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            pdf_allowed_extensions: parse_list(&get_or("PDF_ALLOWED_EXTENSIONS", "pdf")),
            markdown_allowed_extensions: parse_list(&get_or(
                "MARKDOWN_ALLOWED_EXTENSIONS",
                "md,txt",
            )),
            docx_allowed_extensions: parse_list(&get_or("DOCX_ALLOWED_EXTENSIONS", "docx,doc")),
            upload_max_attempts: get_or(
                "UPLOAD_MAX_ATTEMPTS",
                &DEFAULT_UPLOAD_MAX_ATTEMPTS.to_string(),
            )
            .parse::<u32>()
            .unwrap_or(DEFAULT_UPLOAD_MAX_ATTEMPTS),
            upload_base_delay_ms: get_or(
                "UPLOAD_BASE_DELAY_MS",
                &DEFAULT_UPLOAD_BASE_DELAY_MS.to_string(),
            )
            .parse::<u64>()
            .unwrap_or(DEFAULT_UPLOAD_BASE_DELAY_MS),
            upload_max_delay_ms: get_or(
                "UPLOAD_MAX_DELAY_MS",
                &DEFAULT_UPLOAD_MAX_DELAY_MS.to_string(),
            )
            .parse::<u64>()
            .unwrap_or(DEFAULT_UPLOAD_MAX_DELAY_MS),
            verify_settle_delay_ms: get_or(
                "VERIFY_SETTLE_DELAY_MS",
                &DEFAULT_VERIFY_SETTLE_DELAY_MS.to_string(),
            )
            .parse::<u64>()
            .unwrap_or(DEFAULT_VERIFY_SETTLE_DELAY_MS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage_bucket.is_none() {
            return Err(anyhow::anyhow!("STORAGE_BUCKET must be set"));
        }

        match self.storage_backend {
            StorageBackend::Http => {
                if self.storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BASE_URL must be set when using the http storage backend"
                    ));
                }
            }
            StorageBackend::S3 => {
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using the s3 storage backend"
                    ));
                }
                if self.storage_public_url.is_none() && self.storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_PUBLIC_URL or STORAGE_BASE_URL must be set to build public object URLs"
                    ));
                }
            }
        }

        if self.upload_max_attempts == 0 {
            return Err(anyhow::anyhow!("UPLOAD_MAX_ATTEMPTS must be at least 1"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if !self.base.log_format.eq("pretty") && !self.base.log_format.eq("json") {
            return Err(anyhow::anyhow!("LOG_FORMAT must be 'pretty' or 'json'"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn minimal_http() -> Vec<(&'static str, &'static str)> {
        vec![
            ("STORAGE_BUCKET", "apuntes"),
            ("STORAGE_BASE_URL", "https://project.example.com/storage/v1"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config(Box::new(
            PipelineConfig::from_lookup(lookup_from(&minimal_http())).unwrap(),
        ));

        assert_eq!(config.storage_backend(), StorageBackend::Http);
        assert_eq!(config.max_upload_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.upload_max_attempts(), 3);
        assert_eq!(config.upload_base_delay(), Duration::from_millis(500));
        assert_eq!(config.verify_settle_delay(), Duration::from_secs(1));
        assert_eq!(
            config.storage_public_url(),
            Some("https://project.example.com/storage/v1")
        );
        assert!(!config.is_production());

        let policy = config.upload_policy();
        assert_eq!(policy.allowed_extensions(DocumentFormat::Markdown), ["md", "txt"]);
    }

    #[test]
    fn test_overrides() {
        let mut vars = minimal_http();
        vars.extend([
            ("ENVIRONMENT", "prod"),
            ("MAX_UPLOAD_SIZE_MB", "2"),
            ("PDF_ALLOWED_EXTENSIONS", ".PDF, .ps"),
            ("UPLOAD_MAX_ATTEMPTS", "5"),
            ("UPLOAD_BASE_DELAY_MS", "not-a-number"),
        ]);
        let config = Config(Box::new(
            PipelineConfig::from_lookup(lookup_from(&vars)).unwrap(),
        ));

        assert!(config.is_production());
        assert_eq!(config.max_upload_size_bytes(), 2 * 1024 * 1024);
        assert_eq!(config.upload_max_attempts(), 5);
        assert_eq!(config.upload_base_delay(), Duration::from_millis(500));
        assert_eq!(
            config.upload_policy().allowed_extensions(DocumentFormat::Pdf),
            ["pdf", "ps"]
        );
    }

    #[test]
    fn test_missing_bucket_is_rejected() {
        let err = PipelineConfig::from_lookup(lookup_from(&[(
            "STORAGE_BASE_URL",
            "https://x.example.com",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("STORAGE_BUCKET"));
    }

    #[test]
    fn test_s3_requires_region() {
        let err = PipelineConfig::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "s3"),
            ("STORAGE_BUCKET", "apuntes"),
            ("STORAGE_PUBLIC_URL", "https://cdn.example.com"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("S3_REGION"));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut vars = minimal_http();
        vars.push(("UPLOAD_MAX_ATTEMPTS", "0"));
        assert!(PipelineConfig::from_lookup(lookup_from(&vars)).is_err());
    }
}
