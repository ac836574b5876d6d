use actix_web::{post, web, HttpRequest, Responder};

use super::{auth_error_response, client_ip, UserProfileBody};
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::services::rate_limiter::RateLimitFlow;
use crate::auth::application::use_cases::verify_email::VerifyEmailRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Verify an email address
///
/// Consumes the token from the verification email. Verifying twice is a
/// conflict, not a success, so clients can tell a replayed link apart.
#[utoipa::path(
    post,
    path = "/api/v1/auth/verify-email/{token}",
    tag = "auth",
    params(
        ("token" = String, Path, description = "Verification token from the email link")
    ),
    responses(
        (
            status = 200,
            description = "Email verified",
            body = inline(SuccessResponse<UserProfileBody>),
        ),
        (
            status = 400,
            description = "Unknown verification token",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "INVALID_VERIFICATION_TOKEN",
                    "message": "Invalid verification token"
                }
            })
        ),
        (
            status = 409,
            description = "Email already verified",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "EMAIL_ALREADY_VERIFIED",
                    "message": "Email is already verified"
                }
            })
        ),
    )
)]
#[post("/api/v1/auth/verify-email/{token}")]
pub async fn verify_email_handler(
    http_req: HttpRequest,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let ip = client_ip(&http_req);
    if let Err(e) = data
        .rate_limiter
        .check(RateLimitFlow::EmailVerification, &ip, None)
        .await
    {
        return auth_error_response(&e);
    }

    let request = match VerifyEmailRequest::new(path.into_inner()) {
        Ok(request) => request,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    match data.verify_email_use_case.execute(request).await {
        Ok(profile) => ApiResponse::success(UserProfileBody::from(profile)),
        Err(e) => auth_error_response(&e),
    }
}
