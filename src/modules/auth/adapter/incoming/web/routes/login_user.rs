use actix_web::{post, web, HttpRequest, Responder};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::{auth_error_response, client_ip, UserProfileBody};
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::services::rate_limiter::RateLimitFlow;
use crate::auth::application::use_cases::login_user::LoginRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Login credentials
#[derive(Deserialize, ToSchema)]
pub struct LoginRequestDto {
    /// Email address
    #[schema(example = "jane@example.com")]
    pub email: String,

    /// Password
    #[schema(example = "SecurePass123")]
    pub password: String,
}

/// An authenticated session: the profile plus both tokens.
#[derive(Serialize, ToSchema)]
pub struct SessionBody {
    /// Authenticated user
    pub user: UserProfileBody,

    /// Short-lived JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiJ9...")]
    pub access_token: String,

    /// Opaque single-use refresh token
    #[schema(example = "4f3c2a9b...")]
    pub refresh_token: String,
}

/// Log in
///
/// Verifies credentials and opens a fresh session. Any previously issued
/// refresh tokens for the account are revoked.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequestDto,
    responses(
        (
            status = 200,
            description = "Login successful",
            body = inline(SuccessResponse<SessionBody>),
        ),
        (
            status = 401,
            description = "Invalid credentials",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "INVALID_CREDENTIALS",
                    "message": "Invalid email or password"
                }
            })
        ),
        (
            status = 429,
            description = "Too many login attempts for this address/account pair",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "TOO_MANY_AUTH_ATTEMPTS",
                    "message": "Too many login attempts, please try again later",
                    "retryAfter": 900
                }
            })
        ),
    )
)]
#[post("/api/v1/auth/login")]
pub async fn login_user_handler(
    http_req: HttpRequest,
    req: web::Json<LoginRequestDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let ip = client_ip(&http_req);
    let dto = req.into_inner();

    // The budget is scoped to ip+email, counted before credential checks so
    // failed guesses and successes burn it alike.
    if let Err(e) = data
        .rate_limiter
        .check(RateLimitFlow::Login, &ip, Some(&dto.email))
        .await
    {
        return auth_error_response(&e);
    }

    info!(email = %dto.email, "Login attempt");

    let request = match LoginRequest::new(dto.email, dto.password) {
        Ok(request) => request,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    match data.login_user_use_case.execute(request).await {
        Ok(response) => {
            info!(user_id = %response.user.id, "User logged in");
            ApiResponse::success(SessionBody {
                user: UserProfileBody::from(response.user),
                access_token: response.access_token,
                refresh_token: response.refresh_token,
            })
        }
        Err(e) => auth_error_response(&e),
    }
}
