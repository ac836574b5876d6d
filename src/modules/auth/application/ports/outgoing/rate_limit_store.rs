use async_trait::async_trait;

/// Counter state after recording a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowState {
    pub count: u64,
    pub retry_after_secs: u64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RateLimitStoreError {
    #[error("Rate limit backend error: {0}")]
    Backend(String),
}

/// Fixed-window hit counter. The store owns window bookkeeping: the first
/// hit on a key opens a window of `window_secs`, later hits count against
/// it until it lapses. A shared backend (Redis) makes the budgets hold
/// across replicas; an in-process map only protects a single instance.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn hit(&self, key: &str, window_secs: u64) -> Result<WindowState, RateLimitStoreError>;
}
