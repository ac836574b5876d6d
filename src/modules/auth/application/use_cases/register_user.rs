use async_trait::async_trait;
use email_address::EmailAddress;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::application::domain::entities::UserProfile;
use crate::auth::application::domain::error::AuthError;
use crate::auth::application::ports::outgoing::password_hasher::PasswordHasher;
use crate::auth::application::ports::outgoing::token_provider::TokenProvider;
use crate::auth::application::ports::outgoing::user_store::{CreateUserData, UserStore};
use crate::auth::application::services::password_policy::{self, PasswordPolicyError};
use crate::auth::application::services::refresh_token_manager::RefreshTokenManager;
use crate::auth::application::services::secure_token::generate_secure_token;
use crate::email::application::ports::outgoing::auth_email_notifier::AuthEmailNotifier;

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 50;

// ========================= Register Request =========================
/// Validated registration request
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    email: String,
    password: String,
    name: String,
}

#[derive(Debug, Clone)]
pub enum RegisterRequestError {
    EmptyEmail,
    InvalidEmailFormat,
    WeakPassword(PasswordPolicyError),
    InvalidName,
}

impl std::fmt::Display for RegisterRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterRequestError::EmptyEmail => write!(f, "Email cannot be empty"),
            RegisterRequestError::InvalidEmailFormat => write!(f, "Invalid email format"),
            RegisterRequestError::WeakPassword(e) => write!(f, "{}", e),
            RegisterRequestError::InvalidName => write!(
                f,
                "Name must be between {} and {} characters",
                MIN_NAME_LEN, MAX_NAME_LEN
            ),
        }
    }
}

impl std::error::Error for RegisterRequestError {}

impl RegisterRequest {
    pub fn new(email: String, password: String, name: String) -> Result<Self, RegisterRequestError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(RegisterRequestError::EmptyEmail);
        }
        if !EmailAddress::is_valid(&email) {
            return Err(RegisterRequestError::InvalidEmailFormat);
        }

        password_policy::validate_password(&password).map_err(RegisterRequestError::WeakPassword)?;

        let name = name.trim().to_string();
        let name_len = name.chars().count();
        if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name_len) {
            return Err(RegisterRequestError::InvalidName);
        }

        Ok(Self {
            email,
            password,
            name,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// Custom deserialization that validates during parsing
impl<'de> Deserialize<'de> for RegisterRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RegisterRequestHelper {
            email: String,
            password: String,
            name: String,
        }

        let helper = RegisterRequestHelper::deserialize(deserializer)?;
        RegisterRequest::new(helper.email, helper.password, helper.name)
            .map_err(serde::de::Error::custom)
    }
}

// ========================= Register Response =========================
#[derive(Debug, Clone, Serialize)]
pub struct RegisterUserResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

// ====================== Register User Use Case ======================
#[async_trait]
pub trait IRegisterUserUseCase: Send + Sync {
    async fn execute(&self, request: RegisterRequest) -> Result<RegisterUserResponse, AuthError>;
}

#[derive(Clone)]
pub struct RegisterUserUseCase {
    users: Arc<dyn UserStore>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_provider: Arc<dyn TokenProvider>,
    refresh_tokens: RefreshTokenManager,
    email_notifier: Arc<dyn AuthEmailNotifier>,
}

impl RegisterUserUseCase {
    pub fn new(
        users: Arc<dyn UserStore>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_provider: Arc<dyn TokenProvider>,
        refresh_tokens: RefreshTokenManager,
        email_notifier: Arc<dyn AuthEmailNotifier>,
    ) -> Self {
        Self {
            users,
            password_hasher,
            token_provider,
            refresh_tokens,
            email_notifier,
        }
    }
}

#[async_trait]
impl IRegisterUserUseCase for RegisterUserUseCase {
    async fn execute(&self, request: RegisterRequest) -> Result<RegisterUserResponse, AuthError> {
        let password_hash = self.password_hasher.hash_password(request.password()).await?;

        let verification_token = generate_secure_token();
        let refresh_token = self.refresh_tokens.mint();

        // User row and first refresh token land in one transaction; the
        // store reports a taken email as a conflict, not a race.
        let user = self
            .users
            .create_user_with_refresh_token(
                CreateUserData {
                    email: request.email().to_string(),
                    name: request.name().to_string(),
                    password_hash,
                    verification_token: verification_token.clone(),
                },
                refresh_token.clone(),
            )
            .await?;

        let access_token = self.token_provider.generate_access_token(&user)?;

        // Delivery is queued; registration does not wait for SMTP.
        if let Err(e) = self
            .email_notifier
            .queue_verification_email(&user.email, &user.name, &verification_token)
            .await
        {
            warn!(error = %e, user_id = %user.id, "Could not queue verification email");
        }

        info!(user_id = %user.id, "User registered");

        Ok(RegisterUserResponse {
            user: UserProfile::from(&user),
            access_token,
            refresh_token: refresh_token.token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::use_cases::test_support::{
        failing_token_provider, test_token_provider, InMemoryRefreshTokenStore, InMemoryUserStore,
        RecordingNotifier, StubPasswordHasher,
    };
    use serde_json::json;

    fn use_case(
        users: Arc<InMemoryUserStore>,
        notifier: Arc<RecordingNotifier>,
    ) -> RegisterUserUseCase {
        RegisterUserUseCase::new(
            users,
            Arc::new(StubPasswordHasher::verifying(true)),
            test_token_provider(),
            RefreshTokenManager::new(Arc::new(InMemoryRefreshTokenStore::default()), 3600),
            notifier,
        )
    }

    fn valid_request() -> RegisterRequest {
        RegisterRequest::new(
            "new@example.com".to_string(),
            "SecurePass123".to_string(),
            "New User".to_string(),
        )
        .unwrap()
    }

    // ==================== RegisterRequest Tests ====================
    #[test]
    fn test_register_request_normalizes_email() {
        let request = RegisterRequest::new(
            "  New@Example.COM ".to_string(),
            "SecurePass123".to_string(),
            "  New User  ".to_string(),
        )
        .unwrap();

        assert_eq!(request.email(), "new@example.com");
        assert_eq!(request.name(), "New User");
    }

    #[test]
    fn test_register_request_rejects_weak_password() {
        let result = RegisterRequest::new(
            "new@example.com".to_string(),
            "alllowercase".to_string(),
            "New User".to_string(),
        );
        assert!(matches!(
            result,
            Err(RegisterRequestError::WeakPassword(
                PasswordPolicyError::MissingUppercase
            ))
        ));
    }

    #[test]
    fn test_register_request_rejects_bad_name() {
        let result = RegisterRequest::new(
            "new@example.com".to_string(),
            "SecurePass123".to_string(),
            "X".to_string(),
        );
        assert!(matches!(result, Err(RegisterRequestError::InvalidName)));

        let result = RegisterRequest::new(
            "new@example.com".to_string(),
            "SecurePass123".to_string(),
            "y".repeat(51),
        );
        assert!(matches!(result, Err(RegisterRequestError::InvalidName)));
    }

    #[test]
    fn test_register_request_deserialize_validates() {
        let ok: Result<RegisterRequest, _> = serde_json::from_value(json!({
            "email": "new@example.com",
            "password": "SecurePass123",
            "name": "New User"
        }));
        assert!(ok.is_ok());

        let bad: Result<RegisterRequest, _> = serde_json::from_value(json!({
            "email": "not-an-email",
            "password": "SecurePass123",
            "name": "New User"
        }));
        assert!(bad.is_err());
    }

    // ==================== RegisterUserUseCase Tests ====================
    #[tokio::test]
    async fn test_register_success_returns_session() {
        let users = Arc::new(InMemoryUserStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let use_case = use_case(users.clone(), notifier.clone());

        let response = use_case.execute(valid_request()).await.unwrap();

        assert_eq!(response.user.email, "new@example.com");
        assert!(!response.user.email_verified);
        assert!(!response.access_token.is_empty());
        assert_eq!(response.refresh_token.len(), 64);
    }

    #[tokio::test]
    async fn test_register_queues_verification_email() {
        let users = Arc::new(InMemoryUserStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let use_case = use_case(users.clone(), notifier.clone());

        use_case.execute(valid_request()).await.unwrap();

        let queued = notifier.verification_emails();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].0, "new@example.com");
        // The emailed token is the one the store persisted
        let stored = users.find_by_email("new@example.com").await.unwrap().unwrap();
        assert_eq!(stored.email_verification_token.as_deref(), Some(queued[0].2.as_str()));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let users = Arc::new(InMemoryUserStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let use_case = use_case(users.clone(), notifier.clone());

        use_case.execute(valid_request()).await.unwrap();
        let result = use_case.execute(valid_request()).await;

        assert!(matches!(result, Err(AuthError::EmailAlreadyExists)));
        assert_eq!(notifier.verification_emails().len(), 1);
    }

    #[tokio::test]
    async fn test_register_succeeds_even_if_email_queue_is_full() {
        let users = Arc::new(InMemoryUserStore::default());
        let notifier = Arc::new(RecordingNotifier::queue_full());
        let use_case = use_case(users, notifier);

        let result = use_case.execute(valid_request()).await;
        assert!(result.is_ok(), "Registration must not fail on email queue issues");
    }

    #[tokio::test]
    async fn test_register_token_generation_failure_is_internal() {
        let users = Arc::new(InMemoryUserStore::default());
        let use_case = RegisterUserUseCase::new(
            users,
            Arc::new(StubPasswordHasher::verifying(true)),
            failing_token_provider(),
            RefreshTokenManager::new(Arc::new(InMemoryRefreshTokenStore::default()), 3600),
            Arc::new(RecordingNotifier::default()),
        );

        let result = use_case.execute(valid_request()).await;
        assert!(matches!(result, Err(AuthError::Infrastructure(_))));
    }
}
