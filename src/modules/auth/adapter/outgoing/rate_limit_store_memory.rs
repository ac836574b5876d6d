use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::auth::application::ports::outgoing::rate_limit_store::{
    RateLimitStore, RateLimitStoreError, WindowState,
};

/// In-process fixed-window counter for development and tests.
///
/// Counters live in a plain map and vanish on restart, so this is not
/// suitable behind more than one instance.
#[derive(Default)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<String, (Instant, u64)>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn hit(&self, key: &str, window_secs: u64) -> Result<WindowState, RateLimitStoreError> {
        let now = Instant::now();
        let window = Duration::from_secs(window_secs);
        let mut windows = self.windows.lock().await;

        let entry = windows.entry(key.to_string()).or_insert((now, 0));
        if now.duration_since(entry.0) >= window {
            *entry = (now, 0);
        }
        entry.1 += 1;

        let elapsed = now.duration_since(entry.0);
        let retry_after_secs = window.saturating_sub(elapsed).as_secs();

        Ok(WindowState {
            count: entry.1,
            retry_after_secs,
        })
    }
}
