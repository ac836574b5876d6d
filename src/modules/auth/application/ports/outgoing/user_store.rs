use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::application::domain::entities::User;
use crate::auth::application::ports::outgoing::refresh_token_store::NewRefreshToken;

#[derive(Debug, Clone)]
pub struct CreateUserData {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub verification_token: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UserStoreError {
    #[error("Email is already registered")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(String),
}

/// Credential store. Lookups only surface live (non-deleted) accounts;
/// soft-deleted rows behave as if they do not exist.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserStoreError>;

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<User>, UserStoreError>;

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, UserStoreError>;

    /// Insert the user row and its first refresh token in one transaction.
    /// Either both exist afterwards or neither does.
    async fn create_user_with_refresh_token(
        &self,
        data: CreateUserData,
        refresh_token: NewRefreshToken,
    ) -> Result<User, UserStoreError>;

    async fn record_login(&self, user_id: Uuid) -> Result<(), UserStoreError>;

    /// Flip `email_verified` and clear the verification token.
    async fn mark_email_verified(&self, user_id: Uuid) -> Result<User, UserStoreError>;

    async fn set_password_reset_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), UserStoreError>;

    /// Store the new password hash and clear both reset columns.
    async fn reset_password(
        &self,
        user_id: Uuid,
        new_password_hash: &str,
    ) -> Result<(), UserStoreError>;
}
