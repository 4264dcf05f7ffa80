//! Sleeper that records requested delays and returns immediately

use apuntes_infra::Sleeper;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct RecordingSleeper {
    recorded: Mutex<Vec<Duration>>,
    cancel_on_sleep: Option<CancellationToken>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
            cancel_on_sleep: None,
        }
    }

    /// Cancel `token` on the first sleep and never wake up, simulating a user
    /// cancelling while a wait is pending.
    pub fn cancelling(token: CancellationToken) -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
            cancel_on_sleep: Some(token),
        }
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.recorded.lock().unwrap().clone()
    }
}

impl Default for RecordingSleeper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.recorded.lock().unwrap().push(duration);
        if let Some(ref token) = self.cancel_on_sleep {
            token.cancel();
            std::future::pending::<()>().await;
        }
    }
}
