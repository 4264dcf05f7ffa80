/// A file selected for submission. Held only until the submission finishes.
#[derive(Clone)]
pub struct UploadCandidate {
    pub data: Vec<u8>,
    pub original_filename: String,
    /// MIME type declared by the caller; may be empty or generic
    pub content_type: String,
}

impl UploadCandidate {
    pub fn new(
        data: Vec<u8>,
        original_filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            data,
            original_filename: original_filename.into(),
            content_type: content_type.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Lower-cased text after the last `.` of the original filename.
    ///
    /// `None` when the filename has no dot or ends with one.
    pub fn declared_extension(&self) -> Option<String> {
        extension_of(&self.original_filename)
    }
}

impl std::fmt::Debug for UploadCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadCandidate")
            .field("original_filename", &self.original_filename)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Extract the lower-cased extension from a filename.
pub fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}
