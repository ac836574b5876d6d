use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::application::domain::entities::UserProfile;
use crate::auth::application::domain::error::AuthError;
use crate::auth::application::ports::outgoing::user_store::UserStore;
use crate::email::application::ports::outgoing::auth_email_notifier::AuthEmailNotifier;

// ====================== Verify Email Request ======================
#[derive(Debug, Clone)]
pub struct VerifyEmailRequest {
    token: String,
}

#[derive(Debug, Clone)]
pub enum VerifyEmailRequestError {
    EmptyToken,
}

impl std::fmt::Display for VerifyEmailRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyEmailRequestError::EmptyToken => {
                write!(f, "Verification token cannot be empty")
            }
        }
    }
}

impl std::error::Error for VerifyEmailRequestError {}

impl VerifyEmailRequest {
    pub fn new(token: String) -> Result<Self, VerifyEmailRequestError> {
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(VerifyEmailRequestError::EmptyToken);
        }
        Ok(Self { token })
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// ====================== Verify Email Use Case ======================
#[async_trait]
pub trait IVerifyEmailUseCase: Send + Sync {
    async fn execute(&self, request: VerifyEmailRequest) -> Result<UserProfile, AuthError>;
}

#[derive(Clone)]
pub struct VerifyEmailUseCase {
    users: Arc<dyn UserStore>,
    email_notifier: Arc<dyn AuthEmailNotifier>,
}

impl VerifyEmailUseCase {
    pub fn new(users: Arc<dyn UserStore>, email_notifier: Arc<dyn AuthEmailNotifier>) -> Self {
        Self {
            users,
            email_notifier,
        }
    }
}

#[async_trait]
impl IVerifyEmailUseCase for VerifyEmailUseCase {
    async fn execute(&self, request: VerifyEmailRequest) -> Result<UserProfile, AuthError> {
        let user = self
            .users
            .find_by_verification_token(request.token())
            .await?
            .ok_or(AuthError::InvalidVerificationToken)?;

        // A second click on the same link changes nothing
        if user.email_verified {
            return Err(AuthError::EmailAlreadyVerified);
        }

        let user = self.users.mark_email_verified(user.id).await?;

        // Delivery is queued; verification does not wait for SMTP.
        if let Err(e) = self
            .email_notifier
            .queue_welcome_email(&user.email, &user.name)
            .await
        {
            warn!(error = %e, user_id = %user.id, "Could not queue welcome email");
        }

        info!(user_id = %user.id, "Email verified");

        Ok(UserProfile::from(&user))
    }
}
