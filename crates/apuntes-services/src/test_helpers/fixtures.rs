//! Test fixtures

use apuntes_core::models::{Document, DocumentFormat, UploadCandidate, UserContext, Visibility};

use crate::submission::NoteSubmission;

pub fn signed_in(owner_id: &str) -> UserContext {
    UserContext::new(owner_id, Some("test-token".to_string()))
}

pub fn markdown_submission(title: &str, filename: &str) -> NoteSubmission {
    NoteSubmission {
        title: title.to_string(),
        format: Some(DocumentFormat::Markdown),
        visibility: Visibility::Public,
        associated_challenge_id: None,
        associated_plan_id: None,
        content: None,
        file: Some(UploadCandidate::new(
            b"# Notes\n\nSome content".to_vec(),
            filename,
            "",
        )),
    }
}

pub fn document(format: Option<DocumentFormat>) -> Document {
    Document {
        id: "doc-1".to_string(),
        title: "Notes".to_string(),
        format,
        visibility: Visibility::Public,
        owner_id: "u1".to_string(),
        associated_challenge_id: None,
        associated_plan_id: None,
        content: None,
        storage_url: None,
        rating_average: 0.0,
        rating_count: 0,
        created_at: None,
    }
}
