use actix_web::{post, web, HttpRequest, Responder};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use super::{auth_error_response, client_ip, MessageBody};
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::services::rate_limiter::RateLimitFlow;
use crate::auth::application::use_cases::reset_password::ResetPasswordRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Request body for completing a password reset
#[derive(Deserialize, ToSchema)]
pub struct ResetPasswordRequestDto {
    /// Token from the reset email
    #[schema(example = "9d8e7f...")]
    pub token: String,

    /// New password (same policy as registration)
    #[schema(example = "NewSecurePass123")]
    pub password: String,
}

/// Complete a password reset
///
/// Sets the new password and revokes every open session for the account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequestDto,
    responses(
        (
            status = 200,
            description = "Password updated, all sessions revoked",
            body = inline(SuccessResponse<MessageBody>),
            example = json!({
                "success": true,
                "data": { "message": "Password has been reset" }
            })
        ),
        (
            status = 400,
            description = "Unknown or expired reset token, or weak password",
            body = ErrorResponse,
            examples(
                ("Unknown token" = (value = json!({
                    "success": false,
                    "error": {
                        "code": "INVALID_RESET_TOKEN",
                        "message": "Invalid reset token"
                    }
                }))),
                ("Expired token" = (value = json!({
                    "success": false,
                    "error": {
                        "code": "EXPIRED_RESET_TOKEN",
                        "message": "Reset token has expired"
                    }
                })))
            )
        ),
    )
)]
#[post("/api/v1/auth/reset-password")]
pub async fn reset_password_handler(
    http_req: HttpRequest,
    req: web::Json<ResetPasswordRequestDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let ip = client_ip(&http_req);
    if let Err(e) = data.rate_limiter.check(RateLimitFlow::Api, &ip, None).await {
        return auth_error_response(&e);
    }

    let dto = req.into_inner();
    let request = match ResetPasswordRequest::new(dto.token, dto.password) {
        Ok(request) => request,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    match data.reset_password_use_case.execute(request).await {
        Ok(()) => {
            info!("Password reset completed");
            ApiResponse::success(MessageBody {
                message: "Password has been reset".to_string(),
            })
        }
        Err(e) => auth_error_response(&e),
    }
}
