use std::sync::Arc;

use actix_web::web;

use crate::auth::application::services::rate_limiter::RateLimiter;
use crate::auth::application::use_cases::fetch_profile::IFetchProfileUseCase;
use crate::auth::application::use_cases::forgot_password::IForgotPasswordUseCase;
use crate::auth::application::use_cases::login_user::ILoginUserUseCase;
use crate::auth::application::use_cases::logout_user::ILogoutUseCase;
use crate::auth::application::use_cases::refresh_token::IRefreshTokenUseCase;
use crate::auth::application::use_cases::register_user::IRegisterUserUseCase;
use crate::auth::application::use_cases::reset_password::IResetPasswordUseCase;
use crate::auth::application::use_cases::verify_email::IVerifyEmailUseCase;
use crate::tests::support::stubs::*;
use crate::AppState;

pub struct TestAppStateBuilder {
    register_user: Arc<dyn IRegisterUserUseCase + Send + Sync>,
    login_user: Arc<dyn ILoginUserUseCase + Send + Sync>,
    refresh_token: Arc<dyn IRefreshTokenUseCase + Send + Sync>,
    logout_user: Arc<dyn ILogoutUseCase + Send + Sync>,
    verify_email: Arc<dyn IVerifyEmailUseCase + Send + Sync>,
    forgot_password: Arc<dyn IForgotPasswordUseCase + Send + Sync>,
    reset_password: Arc<dyn IResetPasswordUseCase + Send + Sync>,
    fetch_profile: Arc<dyn IFetchProfileUseCase + Send + Sync>,
    rate_limiter: RateLimiter,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self {
            register_user: Arc::new(StubRegisterUserUseCase),
            login_user: Arc::new(StubLoginUserUseCase),
            refresh_token: Arc::new(StubRefreshTokenUseCase),
            logout_user: Arc::new(StubLogoutUseCase),
            verify_email: Arc::new(StubVerifyEmailUseCase),
            forgot_password: Arc::new(StubForgotPasswordUseCase),
            reset_password: Arc::new(StubResetPasswordUseCase),
            fetch_profile: Arc::new(StubFetchProfileUseCase),
            rate_limiter: open_rate_limiter(),
        }
    }
}

impl TestAppStateBuilder {
    pub fn with_register_user(
        mut self,
        uc: impl IRegisterUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.register_user = Arc::new(uc);
        self
    }

    pub fn with_login_user(mut self, uc: impl ILoginUserUseCase + Send + Sync + 'static) -> Self {
        self.login_user = Arc::new(uc);
        self
    }

    pub fn with_refresh_token(
        mut self,
        uc: impl IRefreshTokenUseCase + Send + Sync + 'static,
    ) -> Self {
        self.refresh_token = Arc::new(uc);
        self
    }

    pub fn with_logout_user(mut self, uc: impl ILogoutUseCase + Send + Sync + 'static) -> Self {
        self.logout_user = Arc::new(uc);
        self
    }

    pub fn with_verify_email(
        mut self,
        uc: impl IVerifyEmailUseCase + Send + Sync + 'static,
    ) -> Self {
        self.verify_email = Arc::new(uc);
        self
    }

    pub fn with_forgot_password(
        mut self,
        uc: impl IForgotPasswordUseCase + Send + Sync + 'static,
    ) -> Self {
        self.forgot_password = Arc::new(uc);
        self
    }

    pub fn with_reset_password(
        mut self,
        uc: impl IResetPasswordUseCase + Send + Sync + 'static,
    ) -> Self {
        self.reset_password = Arc::new(uc);
        self
    }

    pub fn with_fetch_profile(
        mut self,
        uc: impl IFetchProfileUseCase + Send + Sync + 'static,
    ) -> Self {
        self.fetch_profile = Arc::new(uc);
        self
    }

    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = limiter;
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        web::Data::new(AppState {
            register_user_use_case: self.register_user,
            login_user_use_case: self.login_user,
            refresh_token_use_case: self.refresh_token,
            logout_user_use_case: self.logout_user,
            verify_email_use_case: self.verify_email,
            forgot_password_use_case: self.forgot_password,
            reset_password_use_case: self.reset_password,
            fetch_profile_use_case: self.fetch_profile,
            rate_limiter: self.rate_limiter,
        })
    }
}
