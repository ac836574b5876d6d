use async_trait::async_trait;
use chrono::{Duration, Utc};
use email_address::EmailAddress;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::{error, info};

use crate::auth::application::domain::error::AuthError;
use crate::auth::application::ports::outgoing::user_store::UserStore;
use crate::auth::application::services::secure_token::generate_secure_token;
use crate::email::application::ports::outgoing::auth_email_notifier::AuthEmailNotifier;

pub const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

// ==================== Forgot Password Request ====================
#[derive(Debug, Clone)]
pub struct ForgotPasswordRequest {
    email: String,
}

#[derive(Debug, Clone)]
pub enum ForgotPasswordRequestError {
    EmptyEmail,
    InvalidEmailFormat,
}

impl std::fmt::Display for ForgotPasswordRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForgotPasswordRequestError::EmptyEmail => write!(f, "Email cannot be empty"),
            ForgotPasswordRequestError::InvalidEmailFormat => write!(f, "Invalid email format"),
        }
    }
}

impl std::error::Error for ForgotPasswordRequestError {}

impl ForgotPasswordRequest {
    pub fn new(email: String) -> Result<Self, ForgotPasswordRequestError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ForgotPasswordRequestError::EmptyEmail);
        }
        if !EmailAddress::is_valid(&email) {
            return Err(ForgotPasswordRequestError::InvalidEmailFormat);
        }
        Ok(Self { email })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl<'de> Deserialize<'de> for ForgotPasswordRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ForgotPasswordRequestHelper {
            email: String,
        }

        let helper = ForgotPasswordRequestHelper::deserialize(deserializer)?;
        ForgotPasswordRequest::new(helper.email).map_err(serde::de::Error::custom)
    }
}

// ==================== Forgot Password Use Case ====================
#[async_trait]
pub trait IForgotPasswordUseCase: Send + Sync {
    async fn execute(&self, request: ForgotPasswordRequest) -> Result<(), AuthError>;
}

#[derive(Clone)]
pub struct ForgotPasswordUseCase {
    users: Arc<dyn UserStore>,
    email_notifier: Arc<dyn AuthEmailNotifier>,
}

impl ForgotPasswordUseCase {
    pub fn new(users: Arc<dyn UserStore>, email_notifier: Arc<dyn AuthEmailNotifier>) -> Self {
        Self {
            users,
            email_notifier,
        }
    }
}

#[async_trait]
impl IForgotPasswordUseCase for ForgotPasswordUseCase {
    async fn execute(&self, request: ForgotPasswordRequest) -> Result<(), AuthError> {
        // The response is identical whether or not the account exists, or
        // the endpoint becomes an account oracle.
        let user = match self.users.find_by_email(request.email()).await? {
            Some(user) => user,
            None => {
                info!("Password reset requested for unknown email");
                return Ok(());
            }
        };

        let token = generate_secure_token();
        let expires_at = Utc::now() + Duration::seconds(RESET_TOKEN_TTL_SECS);
        self.users
            .set_password_reset_token(user.id, &token, expires_at)
            .await?;

        // Sent inline rather than queued: the user is sitting on the reset
        // page waiting for this one.
        if let Err(e) = self
            .email_notifier
            .send_password_reset_email(&user.email, &user.name, &token)
            .await
        {
            error!(error = %e, user_id = %user.id, "Could not send password reset email");
            return Err(AuthError::Infrastructure(
                "Failed to send password reset email".to_string(),
            ));
        }

        info!(user_id = %user.id, "Password reset email sent");
        Ok(())
    }
}
