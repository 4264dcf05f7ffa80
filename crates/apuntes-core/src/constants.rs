//! Pipeline-wide defaults.

/// Upload size ceiling when `MAX_UPLOAD_SIZE_MB` is not set.
pub const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 10;

/// Total upload attempts (1 initial + 2 retries).
pub const DEFAULT_UPLOAD_MAX_ATTEMPTS: u32 = 3;

/// Base for the exponential backoff; retry n waits `base * 2^n`.
pub const DEFAULT_UPLOAD_BASE_DELAY_MS: u64 = 500;

/// Upper bound for a single backoff sleep.
pub const DEFAULT_UPLOAD_MAX_DELAY_MS: u64 = 30_000;

/// Wait before the post-upload existence probe.
pub const DEFAULT_VERIFY_SETTLE_DELAY_MS: u64 = 1_000;

/// Slug used when a note has no usable title characters.
pub const UNTITLED_SLUG: &str = "untitled";

/// Path segment that marks publicly readable objects on the storage endpoint.
pub const PUBLIC_OBJECT_PREFIX: &str = "object/public";
