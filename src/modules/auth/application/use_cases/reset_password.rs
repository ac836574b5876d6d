use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::application::domain::error::AuthError;
use crate::auth::application::ports::outgoing::password_hasher::PasswordHasher;
use crate::auth::application::ports::outgoing::refresh_token_store::RefreshTokenStore;
use crate::auth::application::ports::outgoing::user_store::UserStore;
use crate::auth::application::services::password_policy::{self, PasswordPolicyError};

// ===================== Reset Password Request =====================
#[derive(Debug, Clone)]
pub struct ResetPasswordRequest {
    token: String,
    password: String,
}

#[derive(Debug, Clone)]
pub enum ResetPasswordRequestError {
    EmptyToken,
    WeakPassword(PasswordPolicyError),
}

impl std::fmt::Display for ResetPasswordRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResetPasswordRequestError::EmptyToken => write!(f, "Reset token cannot be empty"),
            ResetPasswordRequestError::WeakPassword(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ResetPasswordRequestError {}

impl ResetPasswordRequest {
    pub fn new(token: String, password: String) -> Result<Self, ResetPasswordRequestError> {
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(ResetPasswordRequestError::EmptyToken);
        }

        password_policy::validate_password(&password)
            .map_err(ResetPasswordRequestError::WeakPassword)?;

        Ok(Self { token, password })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl<'de> Deserialize<'de> for ResetPasswordRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ResetPasswordRequestHelper {
            token: String,
            password: String,
        }

        let helper = ResetPasswordRequestHelper::deserialize(deserializer)?;
        ResetPasswordRequest::new(helper.token, helper.password).map_err(serde::de::Error::custom)
    }
}

// ===================== Reset Password Use Case =====================
#[async_trait]
pub trait IResetPasswordUseCase: Send + Sync {
    async fn execute(&self, request: ResetPasswordRequest) -> Result<(), AuthError>;
}

#[derive(Clone)]
pub struct ResetPasswordUseCase {
    users: Arc<dyn UserStore>,
    password_hasher: Arc<dyn PasswordHasher>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl ResetPasswordUseCase {
    pub fn new(
        users: Arc<dyn UserStore>,
        password_hasher: Arc<dyn PasswordHasher>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
    ) -> Self {
        Self {
            users,
            password_hasher,
            refresh_tokens,
        }
    }
}

#[async_trait]
impl IResetPasswordUseCase for ResetPasswordUseCase {
    async fn execute(&self, request: ResetPasswordRequest) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_reset_token(request.token())
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        let still_valid = user
            .password_reset_expires
            .is_some_and(|expires| expires > Utc::now());
        if !still_valid {
            warn!(user_id = %user.id, "Password reset rejected: token expired");
            return Err(AuthError::ExpiredResetToken);
        }

        let password_hash = self.password_hasher.hash_password(request.password()).await?;
        self.users.reset_password(user.id, &password_hash).await?;

        // Whoever held the old password loses every open session
        self.refresh_tokens.revoke_all_for_user(user.id).await?;

        info!(user_id = %user.id, "Password reset completed");
        Ok(())
    }
}
