use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::entities::UserProfile;
use crate::auth::application::domain::error::AuthError;
use crate::auth::application::ports::outgoing::user_store::UserStore;

// ====================== Fetch Profile Use Case ======================
#[async_trait]
pub trait IFetchProfileUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid) -> Result<UserProfile, AuthError>;
}

#[derive(Clone)]
pub struct FetchProfileUseCase {
    users: Arc<dyn UserStore>,
}

impl FetchProfileUseCase {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl IFetchProfileUseCase for FetchProfileUseCase {
    async fn execute(&self, user_id: Uuid) -> Result<UserProfile, AuthError> {
        // A valid access token can outlive its account (soft delete), so
        // the lookup can still miss.
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserProfile::from(&user))
    }
}
