use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Something that can wait for a duration
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real-time sleeper backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleep unless `token` is cancelled first.
///
/// Returns `false` when the wait was cut short by cancellation.
pub async fn sleep_cancellable(
    sleeper: &dyn Sleeper,
    duration: Duration,
    token: &CancellationToken,
) -> bool {
    if token.is_cancelled() {
        return false;
    }

    tokio::select! {
        _ = token.cancelled() => false,
        _ = sleeper.sleep(duration) => true,
    }
}
