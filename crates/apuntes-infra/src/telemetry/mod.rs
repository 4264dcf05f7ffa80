//! Tracing initialization
//!
//! Log verbosity follows `RUST_LOG`; output format follows `LOG_FORMAT`.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry};
