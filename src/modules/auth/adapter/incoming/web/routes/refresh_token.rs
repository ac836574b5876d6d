use actix_web::{post, web, HttpRequest, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{auth_error_response, client_ip};
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::services::rate_limiter::RateLimitFlow;
use crate::auth::application::use_cases::refresh_token::RefreshTokenRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Request body for token rotation
#[derive(Deserialize, ToSchema)]
pub struct RefreshTokenRequestDto {
    /// The refresh token issued at login or by a previous rotation
    #[schema(example = "4f3c2a9b...")]
    pub refresh_token: String,
}

#[derive(Serialize, ToSchema)]
pub struct TokenPairBody {
    /// Fresh JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiJ9...")]
    pub access_token: String,

    /// Replacement refresh token; the submitted one is now dead
    #[schema(example = "9d8e7f...")]
    pub refresh_token: String,
}

/// Rotate a refresh token
///
/// Exchanges a live refresh token for a new access/refresh pair. Each token
/// rotates exactly once; replaying a consumed token is rejected.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    request_body = RefreshTokenRequestDto,
    responses(
        (
            status = 200,
            description = "New token pair issued",
            body = inline(SuccessResponse<TokenPairBody>),
        ),
        (
            status = 401,
            description = "Unknown, expired, revoked or already-used token",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "INVALID_REFRESH_TOKEN",
                    "message": "Invalid or expired refresh token"
                }
            })
        ),
    )
)]
#[post("/api/v1/auth/refresh")]
pub async fn refresh_token_handler(
    http_req: HttpRequest,
    req: web::Json<RefreshTokenRequestDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let ip = client_ip(&http_req);
    if let Err(e) = data.rate_limiter.check(RateLimitFlow::Api, &ip, None).await {
        return auth_error_response(&e);
    }

    let request = match RefreshTokenRequest::new(req.into_inner().refresh_token) {
        Ok(request) => request,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    match data.refresh_token_use_case.execute(request).await {
        Ok(response) => ApiResponse::success(TokenPairBody {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        }),
        Err(e) => auth_error_response(&e),
    }
}
