use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::debug;

use crate::auth::application::domain::error::AuthError;
use crate::auth::application::ports::outgoing::refresh_token_store::RefreshTokenStore;

// ========================= Logout Request =========================
#[derive(Debug, Clone)]
pub struct LogoutRequest {
    refresh_token: String,
}

#[derive(Debug, Clone)]
pub enum LogoutRequestError {
    EmptyToken,
}

impl std::fmt::Display for LogoutRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogoutRequestError::EmptyToken => write!(f, "Refresh token cannot be empty"),
        }
    }
}

impl std::error::Error for LogoutRequestError {}

impl LogoutRequest {
    pub fn new(refresh_token: String) -> Result<Self, LogoutRequestError> {
        let refresh_token = refresh_token.trim().to_string();
        if refresh_token.is_empty() {
            return Err(LogoutRequestError::EmptyToken);
        }
        Ok(Self { refresh_token })
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

impl<'de> Deserialize<'de> for LogoutRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct LogoutRequestHelper {
            refresh_token: String,
        }

        let helper = LogoutRequestHelper::deserialize(deserializer)?;
        LogoutRequest::new(helper.refresh_token).map_err(serde::de::Error::custom)
    }
}

// ========================= Logout Use Case =========================
#[async_trait]
pub trait ILogoutUseCase: Send + Sync {
    async fn execute(&self, request: LogoutRequest) -> Result<(), AuthError>;
}

#[derive(Clone)]
pub struct LogoutUseCase {
    refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl LogoutUseCase {
    pub fn new(refresh_tokens: Arc<dyn RefreshTokenStore>) -> Self {
        Self { refresh_tokens }
    }
}

#[async_trait]
impl ILogoutUseCase for LogoutUseCase {
    async fn execute(&self, request: LogoutRequest) -> Result<(), AuthError> {
        // Idempotent: revoking an unknown or already-revoked token still
        // reports success, so a retried logout never errors.
        self.refresh_tokens.revoke(request.refresh_token()).await?;
        debug!("Refresh token revoked");
        Ok(())
    }
}
