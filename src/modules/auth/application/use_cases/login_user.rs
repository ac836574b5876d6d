use async_trait::async_trait;
use email_address::EmailAddress;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::application::domain::entities::UserProfile;
use crate::auth::application::domain::error::AuthError;
use crate::auth::application::ports::outgoing::password_hasher::PasswordHasher;
use crate::auth::application::ports::outgoing::token_provider::TokenProvider;
use crate::auth::application::ports::outgoing::user_store::UserStore;
use crate::auth::application::services::refresh_token_manager::RefreshTokenManager;

// ========================= Login Request =========================
/// Validated login request - can be deserialized directly from JSON
#[derive(Debug, Clone)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone)]
pub enum LoginRequestError {
    EmptyEmail,
    InvalidEmailFormat,
    EmptyPassword,
}

impl std::fmt::Display for LoginRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginRequestError::EmptyEmail => write!(f, "Email cannot be empty"),
            LoginRequestError::InvalidEmailFormat => write!(f, "Invalid email format"),
            LoginRequestError::EmptyPassword => write!(f, "Password cannot be empty"),
        }
    }
}

impl std::error::Error for LoginRequestError {}

impl LoginRequest {
    pub fn new(email: String, password: String) -> Result<Self, LoginRequestError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(LoginRequestError::EmptyEmail);
        }
        if !EmailAddress::is_valid(&email) {
            return Err(LoginRequestError::InvalidEmailFormat);
        }

        // No policy check here: old accounts may predate the current rules
        if password.trim().is_empty() {
            return Err(LoginRequestError::EmptyPassword);
        }

        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// Custom deserialization that validates during parsing
impl<'de> Deserialize<'de> for LoginRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct LoginRequestHelper {
            email: String,
            password: String,
        }

        let helper = LoginRequestHelper::deserialize(deserializer)?;
        LoginRequest::new(helper.email, helper.password).map_err(serde::de::Error::custom)
    }
}

// ========================= Login Response =========================
#[derive(Debug, Clone, Serialize)]
pub struct LoginUserResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

// ======================= Login User Use Case ======================
#[async_trait]
pub trait ILoginUserUseCase: Send + Sync {
    async fn execute(&self, request: LoginRequest) -> Result<LoginUserResponse, AuthError>;
}

#[derive(Clone)]
pub struct LoginUserUseCase {
    users: Arc<dyn UserStore>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_provider: Arc<dyn TokenProvider>,
    refresh_tokens: RefreshTokenManager,
}

impl LoginUserUseCase {
    pub fn new(
        users: Arc<dyn UserStore>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_provider: Arc<dyn TokenProvider>,
        refresh_tokens: RefreshTokenManager,
    ) -> Self {
        Self {
            users,
            password_hasher,
            token_provider,
            refresh_tokens,
        }
    }
}

#[async_trait]
impl ILoginUserUseCase for LoginUserUseCase {
    async fn execute(&self, request: LoginRequest) -> Result<LoginUserResponse, AuthError> {
        // Unknown account, deleted account and wrong password must all
        // surface as the same error, or the endpoint leaks which emails
        // have accounts.
        let user = match self.users.find_by_email(request.email()).await? {
            Some(user) => user,
            None => {
                warn!("Login failed: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let password_ok = self
            .password_hasher
            .verify_password(request.password(), &user.password_hash)
            .await?;
        if !password_ok {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        self.users.record_login(user.id).await?;

        // Single active session: a fresh login invalidates every earlier
        // refresh token of the account.
        self.refresh_tokens.revoke_all_for_user(user.id).await?;
        let refresh_token = self.refresh_tokens.issue(user.id).await?;

        let access_token = self.token_provider.generate_access_token(&user)?;

        info!(user_id = %user.id, "User logged in");

        Ok(LoginUserResponse {
            user: UserProfile::from(&user),
            access_token,
            refresh_token: refresh_token.token,
        })
    }
}
