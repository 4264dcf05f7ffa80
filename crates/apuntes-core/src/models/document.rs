use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Declared format of a note's attached document.
///
/// A note without a format is rendered through the free-text path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Markdown,
    Docx,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 3] = [
        DocumentFormat::Pdf,
        DocumentFormat::Markdown,
        DocumentFormat::Docx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Markdown => "markdown",
            DocumentFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "markdown" | "md" => Ok(DocumentFormat::Markdown),
            "docx" | "doc" | "word" => Ok(DocumentFormat::Docx),
            other => Err(anyhow::anyhow!("Invalid document format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

impl FromStr for Visibility {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(anyhow::anyhow!("Invalid visibility: {}", other)),
        }
    }
}

/// A persisted note record, as returned by the metadata API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub format: Option<DocumentFormat>,
    #[serde(default)]
    pub visibility: Visibility,
    pub owner_id: String,
    #[serde(default)]
    pub associated_challenge_id: Option<String>,
    #[serde(default)]
    pub associated_plan_id: Option<String>,
    #[serde(default, rename = "freeTextContent", alias = "content")]
    pub content: Option<String>,
    #[serde(default)]
    pub storage_url: Option<String>,
    #[serde(default)]
    pub rating_average: f64,
    #[serde(default)]
    pub rating_count: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Free-text content, if any non-whitespace text is present
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Stored object URL, if present and non-empty
    pub fn storage_url(&self) -> Option<&str> {
        self.storage_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// Payload for `POST /documents`.
///
/// Built in one step by the submission coordinator once the upload outcome is known;
/// the metadata backend assigns `id` and `ownerId` from the bearer credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    pub format: Option<DocumentFormat>,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_challenge_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_text_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub storage_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        Document {
            id: "doc-1".to_string(),
            title: "Algebra".to_string(),
            format: Some(DocumentFormat::Pdf),
            visibility: Visibility::Public,
            owner_id: "u1".to_string(),
            associated_challenge_id: None,
            associated_plan_id: Some("plan-7".to_string()),
            content: Some("   ".to_string()),
            storage_url: Some("https://cdn.example.com/object/public/notes/u1/a.pdf".to_string()),
            rating_average: 4.5,
            rating_count: 2,
            created_at: None,
        }
    }

    #[test]
    fn test_document_deserializes_camel_case_payload() {
        let json = serde_json::json!({
            "id": "42",
            "title": "Notes",
            "format": "markdown",
            "visibility": "public",
            "ownerId": "u1",
            "associatedChallengeId": "c-1",
            "freeTextContent": "# Hi",
            "storageUrl": null,
            "ratingAverage": 3.0,
            "ratingCount": 1
        });

        let doc: Document = serde_json::from_value(json).unwrap();
        assert_eq!(doc.format, Some(DocumentFormat::Markdown));
        assert_eq!(doc.visibility, Visibility::Public);
        assert_eq!(doc.associated_challenge_id.as_deref(), Some("c-1"));
        assert_eq!(doc.content(), Some("# Hi"));
        assert_eq!(doc.storage_url(), None);
    }

    #[test]
    fn test_document_missing_optional_fields_use_defaults() {
        let json = serde_json::json!({ "id": "1", "title": "T", "ownerId": "u" });
        let doc: Document = serde_json::from_value(json).unwrap();
        assert_eq!(doc.format, None);
        assert_eq!(doc.visibility, Visibility::Private);
        assert_eq!(doc.rating_count, 0);
    }

    #[test]
    fn test_blank_content_is_treated_as_absent() {
        let doc = sample_document();
        assert_eq!(doc.content(), None);
        assert!(doc.storage_url().is_some());
    }

    #[test]
    fn test_format_parsing_accepts_aliases() {
        assert_eq!("MD".parse::<DocumentFormat>().unwrap(), DocumentFormat::Markdown);
        assert_eq!("word".parse::<DocumentFormat>().unwrap(), DocumentFormat::Docx);
        assert!("odt".parse::<DocumentFormat>().is_err());
    }

    #[test]
    fn test_new_document_serialization_skips_absent_fields() {
        let new_doc = NewDocument {
            title: "Notes".to_string(),
            format: Some(DocumentFormat::Docx),
            visibility: Visibility::Private,
            associated_challenge_id: None,
            associated_plan_id: None,
            free_text_content: None,
            storage_url: Some("https://x.example.com/object/public/b/u/k.docx".to_string()),
        };

        let value = serde_json::to_value(&new_doc).unwrap();
        assert_eq!(value["format"], "docx");
        assert_eq!(value["visibility"], "private");
        assert!(value.get("associatedChallengeId").is_none());
        assert!(value.get("freeTextContent").is_none());
        assert!(new_doc.validate().is_ok());
    }

    #[test]
    fn test_new_document_rejects_empty_title() {
        let new_doc = NewDocument {
            title: String::new(),
            format: None,
            visibility: Visibility::Public,
            associated_challenge_id: None,
            associated_plan_id: None,
            free_text_content: Some("text".to_string()),
            storage_url: None,
        };
        assert!(new_doc.validate().is_err());
    }
}
