pub mod jwt;
pub mod rate_limit_store_memory;
pub mod rate_limit_store_redis;
pub mod refresh_token_store_postgres;
pub mod sea_orm_entity;
pub mod security;
pub mod user_store_postgres;

pub use rate_limit_store_memory::InMemoryRateLimitStore;
pub use rate_limit_store_redis::RedisRateLimitStore;
pub use refresh_token_store_postgres::RefreshTokenStorePostgres;
pub use user_store_postgres::UserStorePostgres;
