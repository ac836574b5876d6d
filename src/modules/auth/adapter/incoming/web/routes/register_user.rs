use actix_web::{post, web, HttpRequest, Responder};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use super::{auth_error_response, client_ip, SessionBody, UserProfileBody};
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::services::rate_limiter::RateLimitFlow;
use crate::auth::application::use_cases::register_user::RegisterRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Request body for account registration
#[derive(Deserialize, ToSchema)]
pub struct RegisterRequestDto {
    /// Email address (unique, case-insensitive)
    #[schema(example = "jane@example.com")]
    pub email: String,

    /// Password (8-128 chars, upper + lower + digit)
    #[schema(example = "SecurePass123")]
    pub password: String,

    /// Display name (2-50 chars)
    #[schema(example = "Jane Doe")]
    pub name: String,
}

/// Register a new account
///
/// Creates the user, opens their first session and queues a verification
/// email. The returned refresh token is opaque and single-use.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequestDto,
    responses(
        (
            status = 201,
            description = "Account created",
            body = inline(SuccessResponse<SessionBody>),
            example = json!({
                "success": true,
                "data": {
                    "user": {
                        "id": "123e4567-e89b-12d3-a456-426614174000",
                        "email": "jane@example.com",
                        "name": "Jane Doe",
                        "role": "user",
                        "email_verified": false,
                        "last_login": null,
                        "created_at": "2026-01-15T09:30:00Z"
                    },
                    "access_token": "eyJhbGciOiJIUzI1NiJ9...",
                    "refresh_token": "4f3c2a..."
                }
            })
        ),
        (
            status = 400,
            description = "Validation error",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Password must contain at least one uppercase letter"
                }
            })
        ),
        (
            status = 409,
            description = "Email already registered",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "EMAIL_ALREADY_EXISTS",
                    "message": "Email is already registered"
                }
            })
        ),
        (
            status = 429,
            description = "Too many registrations from this address",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "TOO_MANY_REGISTRATIONS",
                    "message": "Too many accounts created, please try again later",
                    "retryAfter": 3600
                }
            })
        ),
    )
)]
#[post("/api/v1/auth/register")]
pub async fn register_user_handler(
    http_req: HttpRequest,
    req: web::Json<RegisterRequestDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let ip = client_ip(&http_req);
    if let Err(e) = data
        .rate_limiter
        .check(RateLimitFlow::Register, &ip, None)
        .await
    {
        return auth_error_response(&e);
    }

    let dto = req.into_inner();
    info!(email = %dto.email, "Registration attempt");

    let request = match RegisterRequest::new(dto.email, dto.password, dto.name) {
        Ok(request) => request,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    match data.register_user_use_case.execute(request).await {
        Ok(response) => {
            info!(user_id = %response.user.id, "User registered");
            ApiResponse::created(SessionBody {
                user: UserProfileBody::from(response.user),
                access_token: response.access_token,
                refresh_token: response.refresh_token,
            })
        }
        Err(e) => auth_error_response(&e),
    }
}
