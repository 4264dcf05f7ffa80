use std::collections::HashMap;

use crate::constants::DEFAULT_MAX_UPLOAD_SIZE_MB;
use crate::models::{extension_of, DocumentFormat, UploadCandidate};

/// Input errors the user can correct. Never retried, never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("A document format must be selected")]
    MissingFormat,

    #[error("No file was selected")]
    MissingFile,

    #[error("Owner id must not be empty")]
    EmptyOwner,

    #[error("Invalid owner id: {0}")]
    InvalidOwner(String),

    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed for {format}: {allowed:?})")]
    InvalidExtension {
        extension: String,
        format: DocumentFormat,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
}

/// Per-format extension allow-list plus a size ceiling.
///
/// Extensions are stored lower-cased and without the leading dot.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_file_size: usize,
    allowed_extensions: HashMap<DocumentFormat, Vec<String>>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        let mut allowed_extensions = HashMap::new();
        allowed_extensions.insert(DocumentFormat::Pdf, vec!["pdf".to_string()]);
        allowed_extensions.insert(
            DocumentFormat::Markdown,
            vec!["md".to_string(), "txt".to_string()],
        );
        allowed_extensions.insert(
            DocumentFormat::Docx,
            vec!["docx".to_string(), "doc".to_string()],
        );

        Self {
            max_file_size: DEFAULT_MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            allowed_extensions,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_file_size: usize) -> Self {
        Self {
            max_file_size,
            ..Self::default()
        }
    }

    /// Replace the allow-list for one format. Leading dots and case are normalized.
    pub fn with_extensions<I, S>(mut self, format: DocumentFormat, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self.allowed_extensions.insert(format, normalized);
        self
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn allowed_extensions(&self, format: DocumentFormat) -> &[String] {
        self.allowed_extensions
            .get(&format)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate the filename's extension against the format's allow-list.
    /// Returns the normalized extension.
    pub fn validate_extension(
        &self,
        format: DocumentFormat,
        filename: &str,
    ) -> Result<String, ValidationError> {
        let extension = extension_of(filename)
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        let allowed = self.allowed_extensions(format);
        if !allowed.iter().any(|e| e == &extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                format,
                allowed: allowed.to_vec(),
            });
        }

        Ok(extension)
    }

    /// Full candidate check: extension first (cheap, no bytes touched), then size.
    pub fn validate(
        &self,
        format: DocumentFormat,
        candidate: &UploadCandidate,
    ) -> Result<String, ValidationError> {
        let extension = self.validate_extension(format, &candidate.original_filename)?;
        self.validate_file_size(candidate.size())?;
        Ok(extension)
    }
}

/// Content type to send with the object.
///
/// A specific declared type is kept; an empty or generic one is replaced with the
/// type implied by the extension.
pub fn resolve_content_type(declared: &str, extension: &str) -> String {
    let declared = declared.trim().to_lowercase();
    if !declared.is_empty() && declared != "application/octet-stream" {
        return declared;
    }

    content_type_for_extension(extension)
        .unwrap_or("application/octet-stream")
        .to_string()
}

pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "pdf" => Some("application/pdf"),
        "md" => Some("text/markdown"),
        "txt" => Some("text/plain"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "doc" => Some("application/msword"),
        _ => None,
    }
}
