pub mod api;
pub mod modules;
pub use modules::auth;
pub use modules::email;
pub mod health;
pub mod shared;

use crate::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::auth::adapter::outgoing::security::argon2_hasher::Argon2Hasher;
use crate::auth::adapter::outgoing::{
    InMemoryRateLimitStore, RedisRateLimitStore, RefreshTokenStorePostgres, UserStorePostgres,
};
use crate::auth::application::ports::outgoing::password_hasher::PasswordHasher;
use crate::auth::application::ports::outgoing::refresh_token_store::RefreshTokenStore;
use crate::auth::application::ports::outgoing::token_provider::TokenProvider;
use crate::auth::application::ports::outgoing::user_store::UserStore;
use crate::auth::application::services::rate_limiter::RateLimiter;
use crate::auth::application::services::refresh_token_manager::RefreshTokenManager;
use crate::auth::application::use_cases::{
    fetch_profile::{FetchProfileUseCase, IFetchProfileUseCase},
    forgot_password::{ForgotPasswordUseCase, IForgotPasswordUseCase},
    login_user::{ILoginUserUseCase, LoginUserUseCase},
    logout_user::{ILogoutUseCase, LogoutUseCase},
    refresh_token::{IRefreshTokenUseCase, RefreshTokenUseCase},
    register_user::{IRegisterUserUseCase, RegisterUserUseCase},
    reset_password::{IResetPasswordUseCase, ResetPasswordUseCase},
    verify_email::{IVerifyEmailUseCase, VerifyEmailUseCase},
};

use crate::email::adapter::outgoing::smtp_sender::SmtpEmailSender;
use crate::email::application::ports::outgoing::auth_email_notifier::AuthEmailNotifier;
use crate::email::application::ports::outgoing::email_sender::EmailSender;
use crate::email::application::services::{AuthEmailService, NotificationQueue};

use actix_web::{web, App, HttpServer};
use deadpool_redis::{Config, Runtime};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use sea_orm::{ConnectOptions, Database};
use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub register_user_use_case: Arc<dyn IRegisterUserUseCase + Send + Sync>,
    pub login_user_use_case: Arc<dyn ILoginUserUseCase + Send + Sync>,
    pub refresh_token_use_case: Arc<dyn IRefreshTokenUseCase + Send + Sync>,
    pub logout_user_use_case: Arc<dyn ILogoutUseCase + Send + Sync>,
    pub verify_email_use_case: Arc<dyn IVerifyEmailUseCase + Send + Sync>,
    pub forgot_password_use_case: Arc<dyn IForgotPasswordUseCase + Send + Sync>,
    pub reset_password_use_case: Arc<dyn IResetPasswordUseCase + Send + Sync>,
    pub fetch_profile_use_case: Arc<dyn IFetchProfileUseCase + Send + Sync>,
    pub rate_limiter: RateLimiter,
}

const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 7;
const DEFAULT_EMAIL_QUEUE_CAPACITY: usize = 256;

#[actix_web::main]
async fn start() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting replex auth service...");

    let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());

    // Try .env.{environment} first, then fall back to .env
    let env_file = format!(".env.{}", env_name);
    if dotenvy::from_filename(&env_file).is_err() {
        dotenvy::dotenv().ok();
    }

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL is not set");
    let host = env::var("HOST").expect("HOST is not set");
    let port = env::var("PORT").expect("PORT is not set");
    let redis_url = env::var("REDIS_URL").expect("REDIS_URL is not set");
    let frontend_url = env::var("FRONTEND_URL").expect("FRONTEND_URL is not set");

    let from_email = env::var("EMAIL_FROM").expect("EMAIL_FROM not set");
    let smtp_sender = if env::var("RUST_ENV").as_deref() == Ok("test") {
        // Local Mailpit
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_port: u16 = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "1025".to_string())
            .parse()
            .expect("Invalid SMTP_PORT");

        SmtpEmailSender::new_local(&smtp_host, smtp_port, &from_email)
    } else {
        let smtp_server = env::var("SMTP_SERVER").expect("SMTP_SERVER not set");
        let smtp_user = env::var("SMTP_USERNAME").expect("SMTP_USERNAME not set");
        let smtp_pass = env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD not set");

        SmtpEmailSender::new(&smtp_server, &smtp_user, &smtp_pass, &from_email)
    };

    let refresh_ttl_secs = env::var("REFRESH_TOKEN_TTL_DAYS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(DEFAULT_REFRESH_TOKEN_TTL_DAYS)
        * 24
        * 3600;

    let queue_capacity = env::var("EMAIL_QUEUE_CAPACITY")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_EMAIL_QUEUE_CAPACITY);

    let server_url = format!("{host}:{port}");
    info!("Server will listen on {}", server_url);

    // Database connection
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(50)
        .min_connections(10)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .expect("Failed to connect to database");

    let db_arc = Arc::new(conn);

    // Redis connection (shared rate-limit counters)
    let redis_pool = Config::from_url(&redis_url)
        .create_pool(Some(Runtime::Tokio1))
        .expect("Failed to create Redis pool");

    let redis_arc = Arc::new(redis_pool);

    // Outgoing adapters
    let jwt_service = JwtTokenService::new(JwtConfig::from_env());
    let token_provider: Arc<dyn TokenProvider> = Arc::new(jwt_service.clone());
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::from_env());
    let users: Arc<dyn UserStore> = Arc::new(UserStorePostgres::new(Arc::clone(&db_arc)));
    let refresh_store: Arc<dyn RefreshTokenStore> =
        Arc::new(RefreshTokenStorePostgres::new(Arc::clone(&db_arc)));
    let refresh_tokens = RefreshTokenManager::new(Arc::clone(&refresh_store), refresh_ttl_secs);
    // Single-instance deployments can skip Redis for the counters
    let rate_limiter = match env::var("RATE_LIMIT_BACKEND").as_deref() {
        Ok("memory") => RateLimiter::new(Arc::new(InMemoryRateLimitStore::new())),
        _ => RateLimiter::new(Arc::new(RedisRateLimitStore::new(Arc::clone(&redis_arc)))),
    };

    // Email delivery: queue for fire-and-forget mail, inline sender for resets
    let email_sender: Arc<dyn EmailSender> = Arc::new(smtp_sender);
    let queue = NotificationQueue::start(Arc::clone(&email_sender), queue_capacity);
    let email_notifier: Arc<dyn AuthEmailNotifier> = Arc::new(AuthEmailService::new(
        Arc::clone(&email_sender),
        queue,
        &frontend_url,
    ));

    // Use cases
    let register_user_use_case = RegisterUserUseCase::new(
        Arc::clone(&users),
        Arc::clone(&password_hasher),
        Arc::clone(&token_provider),
        refresh_tokens.clone(),
        Arc::clone(&email_notifier),
    );
    let login_user_use_case = LoginUserUseCase::new(
        Arc::clone(&users),
        Arc::clone(&password_hasher),
        Arc::clone(&token_provider),
        refresh_tokens.clone(),
    );
    let refresh_token_use_case = RefreshTokenUseCase::new(
        Arc::clone(&users),
        Arc::clone(&token_provider),
        refresh_tokens.clone(),
    );
    let logout_user_use_case = LogoutUseCase::new(Arc::clone(&refresh_store));
    let verify_email_use_case =
        VerifyEmailUseCase::new(Arc::clone(&users), Arc::clone(&email_notifier));
    let forgot_password_use_case =
        ForgotPasswordUseCase::new(Arc::clone(&users), Arc::clone(&email_notifier));
    let reset_password_use_case = ResetPasswordUseCase::new(
        Arc::clone(&users),
        Arc::clone(&password_hasher),
        Arc::clone(&refresh_store),
    );
    let fetch_profile_use_case = FetchProfileUseCase::new(Arc::clone(&users));

    let state = AppState {
        register_user_use_case: Arc::new(register_user_use_case),
        login_user_use_case: Arc::new(login_user_use_case),
        refresh_token_use_case: Arc::new(refresh_token_use_case),
        logout_user_use_case: Arc::new(logout_user_use_case),
        verify_email_use_case: Arc::new(verify_email_use_case),
        forgot_password_use_case: Arc::new(forgot_password_use_case),
        reset_password_use_case: Arc::new(reset_password_use_case),
        fetch_profile_use_case: Arc::new(fetch_profile_use_case),
        rate_limiter,
    };

    // The bearer-token extractor resolves this out of app data
    let token_provider_data: Arc<dyn TokenProvider + Send + Sync> = Arc::new(jwt_service);
    let db_for_server = Arc::clone(&db_arc);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(Arc::clone(&token_provider_data)))
            .app_data(web::Data::new(Arc::clone(&db_for_server)))
            .app_data(web::Data::new(Arc::clone(&redis_arc)))
            .app_data(crate::shared::api::custom_json_config())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", crate::api::openapi::ApiDoc::openapi()),
            )
            .configure(init_routes)
    })
    .bind(server_url)?
    .run()
    .await
}

fn init_routes(cfg: &mut web::ServiceConfig) {
    // Health
    cfg.service(crate::health::health);
    cfg.service(crate::health::readiness);
    // Auth
    cfg.service(crate::auth::adapter::incoming::web::routes::register_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::login_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::refresh_token_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::logout_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::verify_email_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::forgot_password_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::reset_password_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::me_handler);
}

fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e}");
    }
}
