use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::application::domain::error::AuthError;
use crate::auth::application::ports::outgoing::token_provider::TokenProvider;
use crate::auth::application::ports::outgoing::user_store::UserStore;
use crate::auth::application::services::refresh_token_manager::RefreshTokenManager;

// ========================= Refresh Request =========================
#[derive(Debug, Clone)]
pub struct RefreshTokenRequest {
    refresh_token: String,
}

#[derive(Debug, Clone)]
pub enum RefreshTokenRequestError {
    EmptyToken,
}

impl std::fmt::Display for RefreshTokenRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshTokenRequestError::EmptyToken => write!(f, "Refresh token cannot be empty"),
        }
    }
}

impl std::error::Error for RefreshTokenRequestError {}

impl RefreshTokenRequest {
    pub fn new(refresh_token: String) -> Result<Self, RefreshTokenRequestError> {
        let refresh_token = refresh_token.trim().to_string();
        if refresh_token.is_empty() {
            return Err(RefreshTokenRequestError::EmptyToken);
        }
        Ok(Self { refresh_token })
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

impl<'de> Deserialize<'de> for RefreshTokenRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RefreshTokenRequestHelper {
            refresh_token: String,
        }

        let helper = RefreshTokenRequestHelper::deserialize(deserializer)?;
        RefreshTokenRequest::new(helper.refresh_token).map_err(serde::de::Error::custom)
    }
}

// ========================= Refresh Response =========================
#[derive(Debug, Clone, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

// ====================== Refresh Token Use Case ======================
#[async_trait]
pub trait IRefreshTokenUseCase: Send + Sync {
    async fn execute(&self, request: RefreshTokenRequest)
        -> Result<RefreshTokenResponse, AuthError>;
}

#[derive(Clone)]
pub struct RefreshTokenUseCase {
    users: Arc<dyn UserStore>,
    token_provider: Arc<dyn TokenProvider>,
    refresh_tokens: RefreshTokenManager,
}

impl RefreshTokenUseCase {
    pub fn new(
        users: Arc<dyn UserStore>,
        token_provider: Arc<dyn TokenProvider>,
        refresh_tokens: RefreshTokenManager,
    ) -> Self {
        Self {
            users,
            token_provider,
            refresh_tokens,
        }
    }
}

#[async_trait]
impl IRefreshTokenUseCase for RefreshTokenUseCase {
    async fn execute(
        &self,
        request: RefreshTokenRequest,
    ) -> Result<RefreshTokenResponse, AuthError> {
        // One conditional write both validates and retires the token, so
        // two concurrent calls with the same token cannot both rotate.
        let user_id = match self.refresh_tokens.consume(request.refresh_token()).await? {
            Some(user_id) => user_id,
            None => {
                warn!("Refresh rejected: token unknown, revoked or expired");
                return Err(AuthError::InvalidRefreshToken);
            }
        };

        // The token row can outlive its account (soft delete)
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let refresh_token = self.refresh_tokens.issue(user.id).await?;
        let access_token = self.token_provider.generate_access_token(&user)?;

        debug!(user_id = %user.id, "Session rotated");

        Ok(RefreshTokenResponse {
            access_token,
            refresh_token: refresh_token.token,
        })
    }
}
