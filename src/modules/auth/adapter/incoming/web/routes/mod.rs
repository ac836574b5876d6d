mod forgot_password;
mod login_user;
mod logout_user;
mod me;
mod refresh_token;
mod register_user;
mod reset_password;
mod verify_email;

pub use forgot_password::{
    __path_forgot_password_handler, forgot_password_handler, ForgotPasswordRequestDto, MessageBody,
};
pub use login_user::{__path_login_user_handler, login_user_handler, LoginRequestDto, SessionBody};
pub use logout_user::{__path_logout_user_handler, logout_user_handler, LogoutRequestDto};
pub use me::{__path_me_handler, me_handler};
pub use refresh_token::{
    __path_refresh_token_handler, refresh_token_handler, RefreshTokenRequestDto, TokenPairBody,
};
pub use register_user::{__path_register_user_handler, register_user_handler, RegisterRequestDto};
pub use reset_password::{
    __path_reset_password_handler, reset_password_handler, ResetPasswordRequestDto,
};
pub use verify_email::{__path_verify_email_handler, verify_email_handler};

use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::auth::application::domain::entities::UserProfile;
use crate::auth::application::domain::error::AuthError;
use crate::shared::api::ApiResponse;

/// User profile as returned by the auth endpoints. The password hash never
/// leaves the domain layer.
#[derive(Serialize, ToSchema)]
pub struct UserProfileBody {
    /// User ID (UUID)
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub id: String,

    /// Email address
    #[schema(example = "jane@example.com")]
    pub email: String,

    /// Display name
    #[schema(example = "Jane Doe")]
    pub name: String,

    /// Role (`user` or `admin`)
    #[schema(example = "user")]
    pub role: String,

    /// Whether the email address has been verified
    #[schema(example = true)]
    pub email_verified: bool,

    /// Last successful login, RFC 3339
    pub last_login: Option<String>,

    /// Account creation time, RFC 3339
    pub created_at: String,
}

impl From<UserProfile> for UserProfileBody {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            email: profile.email,
            name: profile.name,
            role: profile.role.to_string(),
            email_verified: profile.email_verified,
            last_login: profile.last_login.map(|t| t.to_rfc3339()),
            created_at: profile.created_at.to_rfc3339(),
        }
    }
}

/// Best available client address: the rightmost Forwarded/X-Forwarded-For
/// entry when behind a proxy, the peer address otherwise.
pub(crate) fn client_ip(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// One place maps the error taxonomy to HTTP. Handlers only add
/// flow-specific logging before delegating here.
pub(crate) fn auth_error_response(err: &AuthError) -> HttpResponse {
    match err {
        AuthError::RateLimited {
            retry_after_secs, ..
        } => ApiResponse::too_many_requests(err.code(), &err.to_string(), *retry_after_secs),

        // Internal detail is logged, never sent to the client
        AuthError::Infrastructure(detail) => {
            error!(error = %detail, "Auth operation failed");
            ApiResponse::internal_error()
        }

        other => {
            warn!(code = other.code(), "Auth request rejected");
            ApiResponse::error(other.status(), other.code(), &other.to_string())
        }
    }
}
