//! Apuntes Infrastructure Library
//!
//! This crate provides shared infrastructure components used by the pipeline services
//! and the CLI:
//! - Telemetry initialization (tracing subscriber)
//! - Retry policy with capped exponential backoff
//! - Injectable, cancellable sleeping

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "retry")]
pub mod retry;

// Re-export commonly used types
#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

#[cfg(feature = "retry")]
pub use retry::{sleep_cancellable, RetryPolicy, Sleeper, TokioSleeper};
