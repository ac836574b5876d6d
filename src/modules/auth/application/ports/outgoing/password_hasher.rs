use async_trait::async_trait;

#[derive(Debug, Clone, thiserror::Error)]
pub enum HashError {
    #[error("Could not hash password")]
    Hash,

    #[error("Stored hash is malformed or uses unsupported parameters")]
    Verify,

    #[error("Hashing task did not complete")]
    Join,
}

/// Password hashing behind an async seam. Implementations are expected to
/// move the actual work off the async runtime.
///
/// `verify_password` returns `Ok(false)` for a wrong password; `Err` means
/// the stored hash itself could not be checked.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, HashError>;
    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, HashError>;
}
