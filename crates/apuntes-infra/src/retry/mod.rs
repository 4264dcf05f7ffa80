//! Retry building blocks
//!
//! `RetryPolicy` computes the delay before each retry. `Sleeper` performs the wait
//! and can be swapped out in tests.

mod policy;
mod sleeper;

pub use policy::RetryPolicy;
pub use sleeper::{sleep_cancellable, Sleeper, TokioSleeper};
