//! Client-side validation applied before any network call

pub mod upload;

pub use upload::{content_type_for_extension, resolve_content_type, UploadPolicy, ValidationError};
