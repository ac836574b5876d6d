use std::fmt;
use std::sync::Arc;

use crate::auth::application::domain::error::AuthError;
use crate::auth::application::ports::outgoing::rate_limit_store::RateLimitStore;

/// The request classes that carry their own abuse budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitFlow {
    Login,
    Register,
    PasswordReset,
    EmailVerification,
    Api,
}

impl RateLimitFlow {
    pub fn window_secs(&self) -> u64 {
        match self {
            RateLimitFlow::Login => 15 * 60,
            RateLimitFlow::Register => 60 * 60,
            RateLimitFlow::PasswordReset => 60 * 60,
            RateLimitFlow::EmailVerification => 10 * 60,
            RateLimitFlow::Api => 15 * 60,
        }
    }

    pub fn max_hits(&self) -> u64 {
        match self {
            RateLimitFlow::Login => 5,
            RateLimitFlow::Register => 3,
            RateLimitFlow::PasswordReset => 3,
            RateLimitFlow::EmailVerification => 5,
            RateLimitFlow::Api => 100,
        }
    }

    fn key_prefix(&self) -> &'static str {
        match self {
            RateLimitFlow::Login => "login",
            RateLimitFlow::Register => "register",
            RateLimitFlow::PasswordReset => "password-reset",
            RateLimitFlow::EmailVerification => "verify-email",
            RateLimitFlow::Api => "api",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            RateLimitFlow::Login => "TOO_MANY_AUTH_ATTEMPTS",
            RateLimitFlow::Register => "TOO_MANY_REGISTRATIONS",
            RateLimitFlow::PasswordReset => "TOO_MANY_PASSWORD_RESETS",
            RateLimitFlow::EmailVerification => "TOO_MANY_VERIFICATION_ATTEMPTS",
            RateLimitFlow::Api => "TOO_MANY_REQUESTS",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            RateLimitFlow::Login => "Too many login attempts, please try again later",
            RateLimitFlow::Register => "Too many accounts created, please try again later",
            RateLimitFlow::PasswordReset => "Too many reset requests, please try again later",
            RateLimitFlow::EmailVerification => {
                "Too many verification attempts, please try again later"
            }
            RateLimitFlow::Api => "Too many requests, please try again later",
        }
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }

    /// Record a hit and reject once the flow's budget is exhausted.
    ///
    /// Login and password-reset keys combine ip and email so one address
    /// cannot burn the budget of everyone behind a NAT. A store outage
    /// fails open: requests pass, and the outage is logged loudly.
    pub async fn check(
        &self,
        flow: RateLimitFlow,
        ip: &str,
        email: Option<&str>,
    ) -> Result<(), AuthError> {
        let key = match email {
            Some(email) => format!(
                "ratelimit:{}:{}:{}",
                flow.key_prefix(),
                ip,
                email.to_lowercase()
            ),
            None => format!("ratelimit:{}:{}", flow.key_prefix(), ip),
        };

        let state = match self.store.hit(&key, flow.window_secs()).await {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Rate limit store unavailable, allowing request");
                return Ok(());
            }
        };

        if state.count > flow.max_hits() {
            tracing::warn!(
                key = %key,
                count = state.count,
                limit = flow.max_hits(),
                "Rate limit exceeded"
            );
            return Err(AuthError::RateLimited {
                code: flow.code(),
                message: flow.message(),
                retry_after_secs: state.retry_after_secs,
            });
        }

        Ok(())
    }
}
