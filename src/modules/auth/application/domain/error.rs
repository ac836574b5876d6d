use actix_web::http::StatusCode;

/// Every failure an auth operation can surface to a client. Handlers map
/// each variant to exactly one HTTP status and stable error code, so new
/// failure modes have to be added here first.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Email is already registered")]
    EmailAlreadyExists,

    #[error("Email is already verified")]
    EmailAlreadyVerified,

    #[error("Invalid verification token")]
    InvalidVerificationToken,

    #[error("Invalid reset token")]
    InvalidResetToken,

    #[error("Reset token has expired")]
    ExpiredResetToken,

    #[error("User not found")]
    UserNotFound,

    #[error("{message}")]
    RateLimited {
        code: &'static str,
        message: &'static str,
        retry_after_secs: u64,
    },

    #[error("Internal error: {0}")]
    Infrastructure(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation { .. } => "VALIDATION_ERROR",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AuthError::Forbidden(_) => "FORBIDDEN",
            AuthError::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            AuthError::EmailAlreadyVerified => "EMAIL_ALREADY_VERIFIED",
            AuthError::InvalidVerificationToken => "INVALID_VERIFICATION_TOKEN",
            AuthError::InvalidResetToken => "INVALID_RESET_TOKEN",
            AuthError::ExpiredResetToken => "EXPIRED_RESET_TOKEN",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::RateLimited { code, .. } => code,
            AuthError::Infrastructure(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation { .. } => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken
            | AuthError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::EmailAlreadyExists | AuthError::EmailAlreadyVerified => {
                StatusCode::CONFLICT
            }
            AuthError::InvalidVerificationToken
            | AuthError::InvalidResetToken
            | AuthError::ExpiredResetToken => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<crate::auth::application::ports::outgoing::user_store::UserStoreError> for AuthError {
    fn from(err: crate::auth::application::ports::outgoing::user_store::UserStoreError) -> Self {
        use crate::auth::application::ports::outgoing::user_store::UserStoreError;
        match err {
            UserStoreError::EmailTaken => AuthError::EmailAlreadyExists,
            UserStoreError::UserNotFound => AuthError::UserNotFound,
            UserStoreError::Database(msg) => AuthError::Infrastructure(msg),
        }
    }
}

impl From<crate::auth::application::ports::outgoing::refresh_token_store::RefreshTokenStoreError>
    for AuthError
{
    fn from(
        err: crate::auth::application::ports::outgoing::refresh_token_store::RefreshTokenStoreError,
    ) -> Self {
        AuthError::Infrastructure(err.to_string())
    }
}

impl From<crate::auth::application::ports::outgoing::password_hasher::HashError> for AuthError {
    fn from(err: crate::auth::application::ports::outgoing::password_hasher::HashError) -> Self {
        AuthError::Infrastructure(err.to_string())
    }
}

impl From<crate::auth::application::ports::outgoing::token_provider::TokenError> for AuthError {
    fn from(err: crate::auth::application::ports::outgoing::token_provider::TokenError) -> Self {
        use crate::auth::application::ports::outgoing::token_provider::TokenError;
        match err {
            TokenError::TokenExpired => AuthError::TokenExpired,
            TokenError::EncodingError(msg) => AuthError::Infrastructure(msg),
            _ => AuthError::InvalidToken,
        }
    }
}
