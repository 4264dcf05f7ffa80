//! Data models for the note pipeline

mod document;
mod upload;
mod user;

pub use document::{Document, DocumentFormat, NewDocument, Visibility};
pub use upload::{extension_of, UploadCandidate};
pub use user::UserContext;
