use crate::api::schemas::{ErrorDetail, ErrorResponse, SuccessResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::auth::adapter::incoming::web::routes::{
    ForgotPasswordRequestDto, LoginRequestDto, LogoutRequestDto, MessageBody,
    RefreshTokenRequestDto, RegisterRequestDto, ResetPasswordRequestDto, SessionBody,
    TokenPairBody, UserProfileBody,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Replex AI Auth API",
        version = "1.0.0",
        description = "Authentication and credential lifecycle for the Replex AI platform",
        contact(
            name = "API Support",
            email = "support@replex.ai"
        )
    ),
    paths(
        crate::auth::adapter::incoming::web::routes::register_user_handler,
        crate::auth::adapter::incoming::web::routes::login_user_handler,
        crate::auth::adapter::incoming::web::routes::refresh_token_handler,
        crate::auth::adapter::incoming::web::routes::logout_user_handler,
        crate::auth::adapter::incoming::web::routes::verify_email_handler,
        crate::auth::adapter::incoming::web::routes::forgot_password_handler,
        crate::auth::adapter::incoming::web::routes::reset_password_handler,
        crate::auth::adapter::incoming::web::routes::me_handler,
    ),
    components(
        schemas(
            SuccessResponse<SessionBody>,
            ErrorResponse,
            ErrorDetail,

            RegisterRequestDto,
            LoginRequestDto,
            RefreshTokenRequestDto,
            LogoutRequestDto,
            ForgotPasswordRequestDto,
            ResetPasswordRequestDto,
            SessionBody,
            TokenPairBody,
            UserProfileBody,
            MessageBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication and session endpoints"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT access token"))
                        .build(),
                ),
            )
        }
    }
}
