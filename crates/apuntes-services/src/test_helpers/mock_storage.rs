//! Mock ObjectStorage implementation for testing

use apuntes_storage::keys::public_object_url;
use apuntes_storage::{ObjectKey, ObjectStorage, StorageBackend, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const MOCK_PUBLIC_BASE: &str = "https://storage.test/storage/v1";
pub const MOCK_BUCKET: &str = "apuntes";

/// Mock storage with scripted results.
///
/// `put_object` pops the next scripted result (success when the script is empty)
/// and keeps successfully written bytes in memory. `exists` pops its own script,
/// falling back to whether the key was written.
pub struct MockStorage {
    put_results: Mutex<VecDeque<StorageResult<()>>>,
    exists_results: Mutex<VecDeque<StorageResult<bool>>>,
    put_log: Mutex<Vec<(String, String)>>,
    exists_calls: Mutex<u32>,
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            put_results: Mutex::new(VecDeque::new()),
            exists_results: Mutex::new(VecDeque::new()),
            put_log: Mutex::new(Vec::new()),
            exists_calls: Mutex::new(0),
            files: Mutex::new(HashMap::new()),
        }
    }

    pub fn push_put_result(&self, result: StorageResult<()>) {
        self.put_results.lock().unwrap().push_back(result);
    }

    pub fn push_exists_result(&self, result: StorageResult<bool>) {
        self.exists_results.lock().unwrap().push_back(result);
    }

    /// Number of `put_object` calls, successful or not
    pub fn put_count(&self) -> usize {
        self.put_log.lock().unwrap().len()
    }

    /// Keys passed to `put_object`, in call order
    pub fn put_keys(&self) -> Vec<String> {
        self.put_log
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Content types passed to `put_object`, in call order
    pub fn put_content_types(&self) -> Vec<String> {
        self.put_log
            .lock()
            .unwrap()
            .iter()
            .map(|(_, content_type)| content_type.clone())
            .collect()
    }

    pub fn exists_calls(&self) -> u32 {
        *self.exists_calls.lock().unwrap()
    }

    pub fn get_file(&self, key: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(key).cloned()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        self.put_log
            .lock()
            .unwrap()
            .push((key.to_string(), content_type.to_string()));

        let result = self.put_results.lock().unwrap().pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            self.files
                .lock()
                .unwrap()
                .insert(key.to_string(), data.to_vec());
        }
        result
    }

    async fn exists(&self, key: &ObjectKey) -> StorageResult<bool> {
        *self.exists_calls.lock().unwrap() += 1;
        match self.exists_results.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(self.files.lock().unwrap().contains_key(key.as_str())),
        }
    }

    fn public_url(&self, key: &ObjectKey) -> String {
        public_object_url(MOCK_PUBLIC_BASE, MOCK_BUCKET, key)
    }

    fn bucket(&self) -> &str {
        MOCK_BUCKET
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Http
    }
}

/// Shorthand for a scripted 5xx
pub fn server_error(status: u16) -> StorageResult<()> {
    Err(StorageError::from_status(status, "scripted failure"))
}
