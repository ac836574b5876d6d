use actix_web::{get, web, HttpRequest, Responder};

use super::{auth_error_response, client_ip, UserProfileBody};
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::auth::application::services::rate_limiter::RateLimitFlow;
use crate::AppState;

/// Fetch the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    security(("BearerAuth" = [])),
    responses(
        (
            status = 200,
            description = "Current profile",
            body = inline(SuccessResponse<UserProfileBody>),
        ),
        (
            status = 401,
            description = "Missing, invalid or expired access token",
            body = ErrorResponse,
            examples(
                ("Expired" = (value = json!({
                    "success": false,
                    "error": {
                        "code": "TOKEN_EXPIRED",
                        "message": "Access token has expired"
                    }
                }))),
                ("Invalid" = (value = json!({
                    "success": false,
                    "error": {
                        "code": "INVALID_TOKEN",
                        "message": "Invalid token"
                    }
                })))
            )
        ),
        (
            status = 404,
            description = "Account no longer exists",
            body = ErrorResponse,
        ),
    )
)]
#[get("/api/v1/auth/me")]
pub async fn me_handler(
    http_req: HttpRequest,
    user: AuthenticatedUser,
    data: web::Data<AppState>,
) -> impl Responder {
    let ip = client_ip(&http_req);
    if let Err(e) = data.rate_limiter.check(RateLimitFlow::Api, &ip, None).await {
        return auth_error_response(&e);
    }

    match data.fetch_profile_use_case.execute(user.user_id).await {
        Ok(profile) => crate::shared::api::ApiResponse::success(UserProfileBody::from(profile)),
        Err(e) => auth_error_response(&e),
    }
}
