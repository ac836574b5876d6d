use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::entities::{User, UserRole};
use crate::auth::application::ports::outgoing::refresh_token_store::NewRefreshToken;
use crate::auth::application::ports::outgoing::user_store::{
    CreateUserData, UserStore, UserStoreError,
};

use super::sea_orm_entity::refresh_tokens::ActiveModel as RefreshTokenActiveModel;
use super::sea_orm_entity::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity,
};

#[derive(Clone, Debug)]
pub struct UserStorePostgres {
    db: Arc<DatabaseConnection>,
}

impl UserStorePostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn map_db_err(e: sea_orm::DbErr) -> UserStoreError {
        UserStoreError::Database(e.to_string())
    }

    fn map_insert_err(e: sea_orm::DbErr) -> UserStoreError {
        let err_str = e.to_string().to_lowercase();
        if err_str.contains("23505")
            || err_str.contains("duplicate key")
            || err_str.contains("unique constraint")
        {
            return UserStoreError::EmailTaken;
        }
        UserStoreError::Database(e.to_string())
    }

    async fn find_one(
        &self,
        filter: sea_orm::Condition,
    ) -> Result<Option<User>, UserStoreError> {
        let model = UserEntity::find()
            .filter(filter)
            .filter(UserColumn::DeletedAt.is_null())
            .one(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        model.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserStore for UserStorePostgres {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        self.find_one(sea_orm::Condition::all().add(UserColumn::Email.eq(email)))
            .await
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserStoreError> {
        self.find_one(sea_orm::Condition::all().add(UserColumn::Id.eq(user_id)))
            .await
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<User>, UserStoreError> {
        self.find_one(
            sea_orm::Condition::all().add(UserColumn::EmailVerificationToken.eq(token)),
        )
        .await
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, UserStoreError> {
        self.find_one(sea_orm::Condition::all().add(UserColumn::PasswordResetToken.eq(token)))
            .await
    }

    async fn create_user_with_refresh_token(
        &self,
        data: CreateUserData,
        refresh_token: NewRefreshToken,
    ) -> Result<User, UserStoreError> {
        let txn = self.db.begin().await.map_err(Self::map_db_err)?;

        let user_id = Uuid::new_v4();
        let active_user = UserActiveModel {
            id: Set(user_id),
            email: Set(data.email),
            password_hash: Set(data.password_hash),
            name: Set(data.name),
            role: Set(UserRole::User.as_str().to_string()),
            email_verified: Set(false),
            email_verification_token: Set(Some(data.verification_token)),
            password_reset_token: Set(None),
            password_reset_expires: Set(None),
            last_login: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
            deleted_at: Set(None),
        };

        let inserted = active_user.insert(&txn).await.map_err(Self::map_insert_err)?;

        let active_token = RefreshTokenActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token: Set(refresh_token.token),
            expires_at: Set(refresh_token.expires_at.into()),
            is_revoked: Set(false),
            created_at: NotSet,
        };

        active_token.insert(&txn).await.map_err(Self::map_db_err)?;

        txn.commit().await.map_err(Self::map_db_err)?;

        User::try_from(inserted)
    }

    async fn record_login(&self, user_id: Uuid) -> Result<(), UserStoreError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(Self::map_db_err)?
            .ok_or(UserStoreError::UserNotFound)?;

        let mut active_user: UserActiveModel = user.into();
        active_user.last_login = Set(Some(Utc::now().into()));

        active_user
            .update(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        Ok(())
    }

    async fn mark_email_verified(&self, user_id: Uuid) -> Result<User, UserStoreError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(Self::map_db_err)?
            .ok_or(UserStoreError::UserNotFound)?;

        let mut active_user: UserActiveModel = user.into();
        active_user.email_verified = Set(true);
        active_user.email_verification_token = Set(None);

        let updated = active_user
            .update(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        User::try_from(updated)
    }

    async fn set_password_reset_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), UserStoreError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(Self::map_db_err)?
            .ok_or(UserStoreError::UserNotFound)?;

        let mut active_user: UserActiveModel = user.into();
        active_user.password_reset_token = Set(Some(token.to_string()));
        active_user.password_reset_expires = Set(Some(expires_at.into()));

        active_user
            .update(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        Ok(())
    }

    async fn reset_password(
        &self,
        user_id: Uuid,
        new_password_hash: &str,
    ) -> Result<(), UserStoreError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(Self::map_db_err)?
            .ok_or(UserStoreError::UserNotFound)?;

        // The reset token is single-use; clearing it here closes the window
        let mut active_user: UserActiveModel = user.into();
        active_user.password_hash = Set(new_password_hash.to_string());
        active_user.password_reset_token = Set(None);
        active_user.password_reset_expires = Set(None);

        active_user
            .update(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::adapter::outgoing::sea_orm_entity::refresh_tokens::Model as RefreshTokenModel;
    use crate::auth::adapter::outgoing::sea_orm_entity::users::Model as UserModel;
    use chrono::{DateTime, FixedOffset, Utc};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn to_fixed_offset(dt: DateTime<Utc>) -> DateTime<FixedOffset> {
        dt.fixed_offset()
    }

    fn user_model(id: Uuid) -> UserModel {
        let now = to_fixed_offset(Utc::now());
        UserModel {
            id,
            email: "test@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            name: "Test User".to_string(),
            role: "user".to_string(),
            email_verified: false,
            email_verification_token: Some("verify-tok".to_string()),
            password_reset_token: None,
            password_reset_expires: None,
            last_login: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn create_data() -> CreateUserData {
        CreateUserData {
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            password_hash: "hashed_password".to_string(),
            verification_token: "verify-tok".to_string(),
        }
    }

    fn new_refresh_token() -> NewRefreshToken {
        NewRefreshToken {
            token: "a".repeat(64),
            expires_at: Utc::now() + chrono::Duration::days(7),
        }
    }

    #[tokio::test]
    async fn test_find_by_email_found() {
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_model(user_id)]])
            .into_connection();

        let store = UserStorePostgres::new(Arc::new(db));

        let found = store.find_by_email("test@example.com").await.unwrap();
        let user = found.expect("user should be found");
        assert_eq!(user.id, user_id);
        assert_eq!(user.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_find_by_email_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<UserModel>::new()])
            .into_connection();

        let store = UserStorePostgres::new(Arc::new(db));

        let found = store.find_by_email("nobody@example.com").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_by_email_unknown_role_is_database_error() {
        let mut model = user_model(Uuid::new_v4());
        model.role = "superuser".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();

        let store = UserStorePostgres::new(Arc::new(db));

        let result = store.find_by_email("test@example.com").await;
        assert!(matches!(result, Err(UserStoreError::Database(_))));
    }

    #[tokio::test]
    async fn test_create_user_with_refresh_token_success() {
        let user_id = Uuid::new_v4();
        let now = to_fixed_offset(Utc::now());

        let token_model = RefreshTokenModel {
            id: Uuid::new_v4(),
            user_id,
            token: "a".repeat(64),
            expires_at: to_fixed_offset(Utc::now() + chrono::Duration::days(7)),
            is_revoked: false,
            created_at: now,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_model(user_id)]])
            .append_query_results([vec![token_model]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 2,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let store = UserStorePostgres::new(Arc::new(db));

        let user = store
            .create_user_with_refresh_token(create_data(), new_refresh_token())
            .await
            .unwrap();

        assert_eq!(user.email, "test@example.com");
        assert!(!user.email_verified);
        assert_eq!(user.email_verification_token.as_deref(), Some("verify-tok"));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom(
                "duplicate key value violates unique constraint".to_string(),
            )])
            .into_connection();

        let store = UserStorePostgres::new(Arc::new(db));

        let result = store
            .create_user_with_refresh_token(create_data(), new_refresh_token())
            .await;

        assert!(matches!(result, Err(UserStoreError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_create_user_database_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection timeout".to_string())])
            .into_connection();

        let store = UserStorePostgres::new(Arc::new(db));

        let result = store
            .create_user_with_refresh_token(create_data(), new_refresh_token())
            .await;

        match result.unwrap_err() {
            UserStoreError::Database(msg) => assert!(msg.contains("connection timeout")),
            other => panic!("Expected Database error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_record_login_success() {
        let user_id = Uuid::new_v4();
        let mut updated = user_model(user_id);
        updated.last_login = Some(to_fixed_offset(Utc::now()));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_model(user_id)]])
            .append_query_results([vec![updated]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let store = UserStorePostgres::new(Arc::new(db));

        assert!(store.record_login(user_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_record_login_user_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<UserModel>::new()])
            .into_connection();

        let store = UserStorePostgres::new(Arc::new(db));

        let result = store.record_login(Uuid::new_v4()).await;
        assert!(matches!(result, Err(UserStoreError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_mark_email_verified_success() {
        let user_id = Uuid::new_v4();
        let mut updated = user_model(user_id);
        updated.email_verified = true;
        updated.email_verification_token = None;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_model(user_id)]])
            .append_query_results([vec![updated]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let store = UserStorePostgres::new(Arc::new(db));

        let user = store.mark_email_verified(user_id).await.unwrap();
        assert!(user.email_verified);
        assert_eq!(user.email_verification_token, None);
    }

    #[tokio::test]
    async fn test_set_password_reset_token_user_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<UserModel>::new()])
            .into_connection();

        let store = UserStorePostgres::new(Arc::new(db));

        let result = store
            .set_password_reset_token(Uuid::new_v4(), "tok", Utc::now())
            .await;
        assert!(matches!(result, Err(UserStoreError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_reset_password_success() {
        let user_id = Uuid::new_v4();
        let mut original = user_model(user_id);
        original.password_reset_token = Some("reset-tok".to_string());
        original.password_reset_expires = Some(to_fixed_offset(Utc::now()));

        let mut updated = user_model(user_id);
        updated.password_hash = "new_hash".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![original]])
            .append_query_results([vec![updated]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let store = UserStorePostgres::new(Arc::new(db));

        assert!(store.reset_password(user_id, "new_hash").await.is_ok());
    }
}
