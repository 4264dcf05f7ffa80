//! Object key generation.
//!
//! Key format: `{owner_id}/{title_slug}_{random}.{extension}`.

use std::fmt;

use apuntes_core::constants::{PUBLIC_OBJECT_PREFIX, UNTITLED_SLUG};
use apuntes_core::models::extension_of;
use apuntes_core::ValidationError;
use uuid::Uuid;

/// A storage-safe object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Accept an existing key after checking it cannot escape the bucket.
    pub fn parse(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
            return Err(ValidationError::InvalidFilename(key));
        }
        Ok(ObjectKey(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extension after the final `.`, if any
    pub fn extension(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(_, ext)| ext)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lower-case the title and map every character outside `[a-z0-9]` to `_`.
///
/// Titles with no letters or digits at all fall back to `untitled`.
pub fn slugify_title(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    if !lowered.chars().any(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
        return UNTITLED_SLUG.to_string();
    }

    lowered
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn validate_owner(owner_id: &str) -> Result<&str, ValidationError> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() {
        return Err(ValidationError::EmptyOwner);
    }
    if owner_id.contains('/')
        || owner_id.contains('\\')
        || owner_id.contains("..")
        || owner_id.chars().any(char::is_whitespace)
    {
        return Err(ValidationError::InvalidOwner(owner_id.to_string()));
    }
    Ok(owner_id)
}

fn storage_safe_extension(original_filename: &str) -> Result<String, ValidationError> {
    let extension = extension_of(original_filename)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .ok_or_else(|| ValidationError::InvalidFilename(original_filename.to_string()))?;
    Ok(extension)
}

/// Generate an object key for a new submission.
///
/// The random component makes two submissions with the same owner and title land
/// on different keys.
pub fn generate_object_key(
    owner_id: &str,
    title: &str,
    original_filename: &str,
) -> Result<ObjectKey, ValidationError> {
    let random = Uuid::new_v4().simple().to_string();
    generate_object_key_with(owner_id, title, original_filename, &random)
}

/// Generate an object key with a caller-supplied random component.
pub fn generate_object_key_with(
    owner_id: &str,
    title: &str,
    original_filename: &str,
    random: &str,
) -> Result<ObjectKey, ValidationError> {
    let owner_id = validate_owner(owner_id)?;
    let extension = storage_safe_extension(original_filename)?;
    let slug = slugify_title(title);
    let random: String = random
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    Ok(ObjectKey(format!(
        "{}/{}_{}.{}",
        owner_id, slug, random, extension
    )))
}

/// Percent-encode each path segment of a key, keeping the `/` separators.
pub fn encode_key_path(key: &ObjectKey) -> String {
    key.as_str()
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Public URL of an object: `{base}/object/public/{bucket}/{key}`
pub fn public_object_url(public_base: &str, bucket: &str, key: &ObjectKey) -> String {
    format!(
        "{}/{}/{}/{}",
        public_base.trim_end_matches('/'),
        PUBLIC_OBJECT_PREFIX,
        bucket,
        encode_key_path(key)
    )
}
