use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use std::sync::Arc;

use crate::auth::application::ports::outgoing::rate_limit_store::{
    RateLimitStore, RateLimitStoreError, WindowState,
};

/// Redis-backed fixed-window counter.
///
/// ## Redis data model
/// ```text
/// {key} -> counter, TTL = window length
/// ```
/// The first hit creates the key and arms its TTL; every later hit inside
/// the window only increments. Redis TTL is the single source of truth for
/// window expiry, so no cleanup job is needed and the counters survive a
/// process restart.
#[derive(Clone)]
pub struct RedisRateLimitStore {
    pool: Arc<Pool>,
}

impl RedisRateLimitStore {
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    async fn get_conn(&self) -> Result<deadpool_redis::Connection, RateLimitStoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| RateLimitStoreError::Backend(format!("Pool error: {}", e)))
    }
}

/// The three commands the window algorithm needs, abstracted so the
/// algorithm can run against something other than a live connection.
#[async_trait]
trait CounterCommands: Send {
    async fn incr(&mut self, key: &str) -> Result<u64, RateLimitStoreError>;
    async fn expire(&mut self, key: &str, secs: i64) -> Result<(), RateLimitStoreError>;
    async fn ttl(&mut self, key: &str) -> Result<i64, RateLimitStoreError>;
}

#[async_trait]
impl CounterCommands for deadpool_redis::Connection {
    async fn incr(&mut self, key: &str) -> Result<u64, RateLimitStoreError> {
        AsyncCommands::incr(self, key, 1)
            .await
            .map_err(|e| RateLimitStoreError::Backend(e.to_string()))
    }

    async fn expire(&mut self, key: &str, secs: i64) -> Result<(), RateLimitStoreError> {
        let _: bool = AsyncCommands::expire(self, key, secs)
            .await
            .map_err(|e| RateLimitStoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn ttl(&mut self, key: &str) -> Result<i64, RateLimitStoreError> {
        AsyncCommands::ttl(self, key)
            .await
            .map_err(|e| RateLimitStoreError::Backend(e.to_string()))
    }
}

async fn fixed_window_hit<C: CounterCommands>(
    conn: &mut C,
    key: &str,
    window_secs: u64,
) -> Result<WindowState, RateLimitStoreError> {
    let count = conn.incr(key).await?;

    if count == 1 {
        conn.expire(key, window_secs as i64).await?;
        return Ok(WindowState {
            count,
            retry_after_secs: window_secs,
        });
    }

    let ttl = conn.ttl(key).await?;

    // A crash between INCR and EXPIRE leaves the key persistent; re-arm
    // the window rather than counting forever.
    let retry_after_secs = if ttl < 0 {
        conn.expire(key, window_secs as i64).await?;
        window_secs
    } else {
        ttl as u64
    };

    Ok(WindowState {
        count,
        retry_after_secs,
    })
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn hit(&self, key: &str, window_secs: u64) -> Result<WindowState, RateLimitStoreError> {
        let mut conn = self.get_conn().await?;
        fixed_window_hit(&mut conn, key, window_secs).await
    }
}
