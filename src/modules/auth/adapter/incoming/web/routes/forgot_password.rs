use actix_web::{post, web, HttpRequest, Responder};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::{auth_error_response, client_ip};
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::services::rate_limiter::RateLimitFlow;
use crate::auth::application::use_cases::forgot_password::ForgotPasswordRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Request body for a password reset link
#[derive(Deserialize, ToSchema)]
pub struct ForgotPasswordRequestDto {
    /// Email address of the account
    #[schema(example = "jane@example.com")]
    pub email: String,
}

/// Plain confirmation message
#[derive(Serialize, ToSchema)]
pub struct MessageBody {
    #[schema(example = "Logged out")]
    pub message: String,
}

/// Request a password reset
///
/// The response body is the same whether or not the account exists; only
/// the mailer failing for a real account surfaces an error.
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequestDto,
    responses(
        (
            status = 200,
            description = "Reset email sent if the account exists",
            body = inline(SuccessResponse<MessageBody>),
            example = json!({
                "success": true,
                "data": {
                    "message": "If that account exists, a password reset link has been sent"
                }
            })
        ),
        (
            status = 429,
            description = "Too many reset requests",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "TOO_MANY_PASSWORD_RESETS",
                    "message": "Too many reset requests, please try again later",
                    "retryAfter": 3600
                }
            })
        ),
    )
)]
#[post("/api/v1/auth/forgot-password")]
pub async fn forgot_password_handler(
    http_req: HttpRequest,
    req: web::Json<ForgotPasswordRequestDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let ip = client_ip(&http_req);
    let dto = req.into_inner();

    if let Err(e) = data
        .rate_limiter
        .check(RateLimitFlow::PasswordReset, &ip, Some(&dto.email))
        .await
    {
        return auth_error_response(&e);
    }

    info!("Password reset requested");

    let request = match ForgotPasswordRequest::new(dto.email) {
        Ok(request) => request,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    match data.forgot_password_use_case.execute(request).await {
        Ok(()) => ApiResponse::success(MessageBody {
            message: "If that account exists, a password reset link has been sent".to_string(),
        }),
        Err(e) => auth_error_response(&e),
    }
}
