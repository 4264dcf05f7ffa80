//! Test helpers for service unit tests
//!
//! In-memory stand-ins for object storage, the metadata API and the sleeper, so
//! the pipeline can be driven without network or real time.

pub mod fixtures;
pub mod mock_metadata;
pub mod mock_storage;
pub mod sleeper;
pub mod warnings;

pub use fixtures::*;
pub use mock_metadata::MockMetadataApi;
pub use mock_storage::MockStorage;
pub use sleeper::RecordingSleeper;
pub use warnings::CapturedWarnings;
