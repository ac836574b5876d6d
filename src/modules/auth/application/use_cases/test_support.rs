//! Shared in-memory fakes for use-case tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::auth::application::domain::entities::{User, UserRole};
use crate::auth::application::ports::outgoing::password_hasher::{HashError, PasswordHasher};
use crate::auth::application::ports::outgoing::refresh_token_store::{
    NewRefreshToken, RefreshTokenStore, RefreshTokenStoreError,
};
use crate::auth::application::ports::outgoing::token_provider::{TokenError, TokenProvider};
use crate::auth::application::ports::outgoing::user_store::{
    CreateUserData, UserStore, UserStoreError,
};
use crate::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::email::application::ports::outgoing::auth_email_notifier::{
    AuthEmailNotifier, EmailNotificationError,
};

pub fn user_with(email: &str, password_hash: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        name: "Test User".to_string(),
        password_hash: password_hash.to_string(),
        role: UserRole::User,
        email_verified: true,
        email_verification_token: None,
        password_reset_token: None,
        password_reset_expires: None,
        last_login: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

// ==================== UserStore fake ====================

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    refresh_store: Option<Arc<InMemoryRefreshTokenStore>>,
    fail: bool,
}

impl InMemoryUserStore {
    pub fn with_user(user: User) -> Self {
        Self {
            users: Mutex::new(vec![user]),
            refresh_store: None,
            fail: false,
        }
    }

    /// Mirrors the registration transaction into the given token store.
    pub fn sharing_refresh_store(store: Arc<InMemoryRefreshTokenStore>) -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            refresh_store: Some(store),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            refresh_store: None,
            fail: true,
        }
    }

    fn guard(&self) -> Result<(), UserStoreError> {
        if self.fail {
            Err(UserStoreError::Database("connection pool exhausted".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        self.guard()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserStoreError> {
        self.guard()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<User>, UserStoreError> {
        self.guard()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| {
                u.email_verification_token.as_deref() == Some(token) && u.deleted_at.is_none()
            })
            .cloned())
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, UserStoreError> {
        self.guard()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.password_reset_token.as_deref() == Some(token) && u.deleted_at.is_none())
            .cloned())
    }

    async fn create_user_with_refresh_token(
        &self,
        data: CreateUserData,
        refresh_token: NewRefreshToken,
    ) -> Result<User, UserStoreError> {
        self.guard()?;
        let user = {
            let mut users = self.users.lock().unwrap();
            if users
                .iter()
                .any(|u| u.email == data.email && u.deleted_at.is_none())
            {
                return Err(UserStoreError::EmailTaken);
            }

            let user = User {
                id: Uuid::new_v4(),
                email: data.email,
                name: data.name,
                password_hash: data.password_hash,
                role: UserRole::User,
                email_verified: false,
                email_verification_token: Some(data.verification_token),
                password_reset_token: None,
                password_reset_expires: None,
                last_login: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                deleted_at: None,
            };
            users.push(user.clone());
            user
        };

        if let Some(store) = &self.refresh_store {
            store
                .insert(user.id, &refresh_token)
                .await
                .map_err(|e| UserStoreError::Database(e.to_string()))?;
        }

        Ok(user)
    }

    async fn record_login(&self, user_id: Uuid) -> Result<(), UserStoreError> {
        self.guard()?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(UserStoreError::UserNotFound)?;
        user.last_login = Some(Utc::now());
        Ok(())
    }

    async fn mark_email_verified(&self, user_id: Uuid) -> Result<User, UserStoreError> {
        self.guard()?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(UserStoreError::UserNotFound)?;
        user.email_verified = true;
        user.email_verification_token = None;
        Ok(user.clone())
    }

    async fn set_password_reset_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), UserStoreError> {
        self.guard()?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(UserStoreError::UserNotFound)?;
        user.password_reset_token = Some(token.to_string());
        user.password_reset_expires = Some(expires_at);
        Ok(())
    }

    async fn reset_password(
        &self,
        user_id: Uuid,
        new_password_hash: &str,
    ) -> Result<(), UserStoreError> {
        self.guard()?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(UserStoreError::UserNotFound)?;
        user.password_hash = new_password_hash.to_string();
        user.password_reset_token = None;
        user.password_reset_expires = None;
        Ok(())
    }
}

// ==================== RefreshTokenStore fake ====================

#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    rows: Mutex<Vec<(Uuid, String, DateTime<Utc>, bool)>>,
}

impl InMemoryRefreshTokenStore {
    pub fn live_count_for(&self, user_id: Uuid) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.0 == user_id && !r.3)
            .count()
    }

    pub fn insert_row(&self, user_id: Uuid, token: &str, expires_at: DateTime<Utc>) {
        self.rows
            .lock()
            .unwrap()
            .push((user_id, token.to_string(), expires_at, false));
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn insert(
        &self,
        user_id: Uuid,
        token: &NewRefreshToken,
    ) -> Result<(), RefreshTokenStoreError> {
        self.insert_row(user_id, &token.token, token.expires_at);
        Ok(())
    }

    async fn consume(&self, token: &str) -> Result<Option<Uuid>, RefreshTokenStoreError> {
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut() {
            if row.1 == token && !row.3 && row.2 > Utc::now() {
                row.3 = true;
                return Ok(Some(row.0));
            }
        }
        Ok(None)
    }

    async fn revoke(&self, token: &str) -> Result<(), RefreshTokenStoreError> {
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut() {
            if row.1 == token {
                row.3 = true;
            }
        }
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, RefreshTokenStoreError> {
        let mut rows = self.rows.lock().unwrap();
        let mut revoked = 0;
        for row in rows.iter_mut() {
            if row.0 == user_id && !row.3 {
                row.3 = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}

// ==================== PasswordHasher stub ====================

pub struct StubPasswordHasher {
    verify_result: bool,
    fail: bool,
}

impl StubPasswordHasher {
    pub fn verifying(verify_result: bool) -> Self {
        Self {
            verify_result,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            verify_result: false,
            fail: true,
        }
    }
}

#[async_trait]
impl PasswordHasher for StubPasswordHasher {
    async fn hash_password(&self, password: &str) -> Result<String, HashError> {
        if self.fail {
            return Err(HashError::Hash);
        }
        Ok(format!("hashed:{password}"))
    }

    async fn verify_password(&self, _password: &str, _hash: &str) -> Result<bool, HashError> {
        if self.fail {
            return Err(HashError::Verify);
        }
        Ok(self.verify_result)
    }
}

// ==================== TokenProvider helpers ====================

pub fn test_token_provider() -> Arc<dyn TokenProvider> {
    Arc::new(JwtTokenService::new(JwtConfig {
        secret_key: "test_secret_key_min_32_characters_long".to_string(),
        issuer: "replex-ai".to_string(),
        audience: "replex-ai-users".to_string(),
        access_token_expiry: 900,
    }))
}

struct FailingTokenProvider;

impl TokenProvider for FailingTokenProvider {
    fn generate_access_token(
        &self,
        _user: &User,
    ) -> Result<String, TokenError> {
        Err(TokenError::EncodingError("signing failed".into()))
    }

    fn verify_access_token(
        &self,
        _token: &str,
    ) -> Result<crate::auth::application::ports::outgoing::token_provider::AccessTokenClaims, TokenError>
    {
        Err(TokenError::MalformedToken)
    }
}

pub fn failing_token_provider() -> Arc<dyn TokenProvider> {
    Arc::new(FailingTokenProvider)
}

// ==================== AuthEmailNotifier fake ====================

#[derive(Default)]
pub struct RecordingNotifier {
    verification: Mutex<Vec<(String, String, String)>>,
    welcome: Mutex<Vec<(String, String)>>,
    reset: Mutex<Vec<(String, String, String)>>,
    queue_full: bool,
    send_fails: bool,
}

impl RecordingNotifier {
    pub fn queue_full() -> Self {
        Self {
            queue_full: true,
            ..Self::default()
        }
    }

    pub fn send_failing() -> Self {
        Self {
            send_fails: true,
            ..Self::default()
        }
    }

    pub fn verification_emails(&self) -> Vec<(String, String, String)> {
        self.verification.lock().unwrap().clone()
    }

    pub fn welcome_emails(&self) -> Vec<(String, String)> {
        self.welcome.lock().unwrap().clone()
    }

    pub fn reset_emails(&self) -> Vec<(String, String, String)> {
        self.reset.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthEmailNotifier for RecordingNotifier {
    async fn queue_verification_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<(), EmailNotificationError> {
        if self.queue_full {
            return Err(EmailNotificationError::QueueFull);
        }
        self.verification.lock().unwrap().push((
            to.to_string(),
            name.to_string(),
            token.to_string(),
        ));
        Ok(())
    }

    async fn queue_welcome_email(
        &self,
        to: &str,
        name: &str,
    ) -> Result<(), EmailNotificationError> {
        if self.queue_full {
            return Err(EmailNotificationError::QueueFull);
        }
        self.welcome
            .lock()
            .unwrap()
            .push((to.to_string(), name.to_string()));
        Ok(())
    }

    async fn send_password_reset_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<(), EmailNotificationError> {
        if self.send_fails {
            return Err(EmailNotificationError::SendFailed(
                "smtp connection refused".into(),
            ));
        }
        self.reset.lock().unwrap().push((
            to.to_string(),
            name.to_string(),
            token.to_string(),
        ));
        Ok(())
    }
}
