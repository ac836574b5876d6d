use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::UserProfile;
use crate::auth::application::domain::error::AuthError;
use crate::auth::application::ports::outgoing::rate_limit_store::{
    RateLimitStore, RateLimitStoreError, WindowState,
};
use crate::auth::application::services::rate_limiter::RateLimiter;
use crate::auth::application::use_cases::fetch_profile::IFetchProfileUseCase;
use crate::auth::application::use_cases::forgot_password::{
    ForgotPasswordRequest, IForgotPasswordUseCase,
};
use crate::auth::application::use_cases::login_user::{
    ILoginUserUseCase, LoginRequest, LoginUserResponse,
};
use crate::auth::application::use_cases::logout_user::{ILogoutUseCase, LogoutRequest};
use crate::auth::application::use_cases::refresh_token::{
    IRefreshTokenUseCase, RefreshTokenRequest, RefreshTokenResponse,
};
use crate::auth::application::use_cases::register_user::{
    IRegisterUserUseCase, RegisterRequest, RegisterUserResponse,
};
use crate::auth::application::use_cases::reset_password::{
    IResetPasswordUseCase, ResetPasswordRequest,
};
use crate::auth::application::use_cases::verify_email::{IVerifyEmailUseCase, VerifyEmailRequest};

// Route tests swap in a scenario mock for the one use case under test;
// everything else stays a stub that blows up if touched.

#[derive(Default, Clone)]
pub struct StubRegisterUserUseCase;

#[async_trait]
impl IRegisterUserUseCase for StubRegisterUserUseCase {
    async fn execute(&self, _: RegisterRequest) -> Result<RegisterUserResponse, AuthError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubLoginUserUseCase;

#[async_trait]
impl ILoginUserUseCase for StubLoginUserUseCase {
    async fn execute(&self, _: LoginRequest) -> Result<LoginUserResponse, AuthError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubRefreshTokenUseCase;

#[async_trait]
impl IRefreshTokenUseCase for StubRefreshTokenUseCase {
    async fn execute(&self, _: RefreshTokenRequest) -> Result<RefreshTokenResponse, AuthError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubLogoutUseCase;

#[async_trait]
impl ILogoutUseCase for StubLogoutUseCase {
    async fn execute(&self, _: LogoutRequest) -> Result<(), AuthError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubVerifyEmailUseCase;

#[async_trait]
impl IVerifyEmailUseCase for StubVerifyEmailUseCase {
    async fn execute(&self, _: VerifyEmailRequest) -> Result<UserProfile, AuthError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubForgotPasswordUseCase;

#[async_trait]
impl IForgotPasswordUseCase for StubForgotPasswordUseCase {
    async fn execute(&self, _: ForgotPasswordRequest) -> Result<(), AuthError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubResetPasswordUseCase;

#[async_trait]
impl IResetPasswordUseCase for StubResetPasswordUseCase {
    async fn execute(&self, _: ResetPasswordRequest) -> Result<(), AuthError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubFetchProfileUseCase;

#[async_trait]
impl IFetchProfileUseCase for StubFetchProfileUseCase {
    async fn execute(&self, _: Uuid) -> Result<UserProfile, AuthError> {
        unimplemented!("Not used in this test")
    }
}

struct OpenStore;

#[async_trait]
impl RateLimitStore for OpenStore {
    async fn hit(&self, _: &str, window_secs: u64) -> Result<WindowState, RateLimitStoreError> {
        Ok(WindowState {
            count: 1,
            retry_after_secs: window_secs,
        })
    }
}

struct ExhaustedStore;

#[async_trait]
impl RateLimitStore for ExhaustedStore {
    async fn hit(&self, _: &str, window_secs: u64) -> Result<WindowState, RateLimitStoreError> {
        // Over every flow's budget
        Ok(WindowState {
            count: u64::MAX,
            retry_after_secs: window_secs,
        })
    }
}

/// A limiter whose budget never runs out.
pub fn open_rate_limiter() -> RateLimiter {
    RateLimiter::new(Arc::new(OpenStore))
}

/// A limiter that rejects every request, for 429 paths.
pub fn exhausted_rate_limiter() -> RateLimiter {
    RateLimiter::new(Arc::new(ExhaustedStore))
}
