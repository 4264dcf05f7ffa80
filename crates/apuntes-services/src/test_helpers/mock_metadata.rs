//! Mock metadata API for testing

use apuntes_core::models::{Document, NewDocument};
use apuntes_core::{DocumentMetadataApi, MetadataError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory metadata backend.
///
/// Created documents get sequential ids (`doc-1`, `doc-2`, ...) and are owned by
/// `owner_id`. A scripted failure makes the next `create_document` fail.
pub struct MockMetadataApi {
    owner_id: String,
    documents: Mutex<HashMap<String, Document>>,
    created: Mutex<Vec<NewDocument>>,
    next_failure: Mutex<Option<MetadataError>>,
    tokens_seen: Mutex<Vec<String>>,
}

impl MockMetadataApi {
    pub fn new(owner_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            documents: Mutex::new(HashMap::new()),
            created: Mutex::new(Vec::new()),
            next_failure: Mutex::new(None),
            tokens_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_next_create(&self, err: MetadataError) {
        *self.next_failure.lock().unwrap() = Some(err);
    }

    pub fn insert(&self, document: Document) {
        self.documents
            .lock()
            .unwrap()
            .insert(document.id.clone(), document);
    }

    /// Payloads received by `create_document`, including rejected ones
    pub fn created(&self) -> Vec<NewDocument> {
        self.created.lock().unwrap().clone()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentMetadataApi for MockMetadataApi {
    async fn create_document(
        &self,
        token: &str,
        document: &NewDocument,
    ) -> Result<Document, MetadataError> {
        self.tokens_seen.lock().unwrap().push(token.to_string());
        self.created.lock().unwrap().push(document.clone());

        if let Some(err) = self.next_failure.lock().unwrap().take() {
            return Err(err);
        }

        let mut documents = self.documents.lock().unwrap();
        let id = format!("doc-{}", documents.len() + 1);
        let created = Document {
            id: id.clone(),
            title: document.title.clone(),
            format: document.format,
            visibility: document.visibility,
            owner_id: self.owner_id.clone(),
            associated_challenge_id: document.associated_challenge_id.clone(),
            associated_plan_id: document.associated_plan_id.clone(),
            content: document.free_text_content.clone(),
            storage_url: document.storage_url.clone(),
            rating_average: 0.0,
            rating_count: 0,
            created_at: None,
        };
        documents.insert(id, created.clone());
        Ok(created)
    }

    async fn get_document(&self, token: &str, id: &str) -> Result<Document, MetadataError> {
        self.tokens_seen.lock().unwrap().push(token.to_string());
        self.documents
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(id.to_string()))
    }
}
