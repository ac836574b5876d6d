use actix_web::{post, web, HttpRequest, Responder};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{auth_error_response, client_ip, MessageBody};
use crate::api::schemas::SuccessResponse;
use crate::auth::application::services::rate_limiter::RateLimitFlow;
use crate::auth::application::use_cases::logout_user::LogoutRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Request body for logout
#[derive(Deserialize, ToSchema)]
pub struct LogoutRequestDto {
    /// The session's refresh token
    #[schema(example = "4f3c2a9b...")]
    pub refresh_token: String,
}

/// Log out
///
/// Revokes the submitted refresh token. Succeeds even when the token is
/// unknown or already revoked, so logout is safe to retry.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    request_body = LogoutRequestDto,
    responses(
        (
            status = 200,
            description = "Session closed",
            body = inline(SuccessResponse<MessageBody>),
            example = json!({
                "success": true,
                "data": { "message": "Logged out" }
            })
        ),
    )
)]
#[post("/api/v1/auth/logout")]
pub async fn logout_user_handler(
    http_req: HttpRequest,
    req: web::Json<LogoutRequestDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let ip = client_ip(&http_req);
    if let Err(e) = data.rate_limiter.check(RateLimitFlow::Api, &ip, None).await {
        return auth_error_response(&e);
    }

    let request = match LogoutRequest::new(req.into_inner().refresh_token) {
        Ok(request) => request,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    match data.logout_user_use_case.execute(request).await {
        Ok(()) => ApiResponse::success(MessageBody {
            message: "Logged out".to_string(),
        }),
        Err(e) => auth_error_response(&e),
    }
}
