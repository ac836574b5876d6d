use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::ports::outgoing::refresh_token_store::{
    NewRefreshToken, RefreshTokenStore, RefreshTokenStoreError,
};

use super::sea_orm_entity::refresh_tokens::{
    ActiveModel as RefreshTokenActiveModel, Column as RefreshTokenColumn,
    Entity as RefreshTokenEntity,
};

#[derive(Clone, Debug)]
pub struct RefreshTokenStorePostgres {
    db: Arc<DatabaseConnection>,
}

impl RefreshTokenStorePostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn map_db_err(e: sea_orm::DbErr) -> RefreshTokenStoreError {
        RefreshTokenStoreError::Database(e.to_string())
    }
}

#[async_trait]
impl RefreshTokenStore for RefreshTokenStorePostgres {
    async fn insert(
        &self,
        user_id: Uuid,
        token: &NewRefreshToken,
    ) -> Result<(), RefreshTokenStoreError> {
        let active_token = RefreshTokenActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token: Set(token.token.clone()),
            expires_at: Set(token.expires_at.into()),
            is_revoked: Set(false),
            created_at: NotSet,
        };

        active_token
            .insert(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        Ok(())
    }

    async fn consume(&self, token: &str) -> Result<Option<Uuid>, RefreshTokenStoreError> {
        // Single conditional UPDATE: of any number of concurrent calls with
        // the same token, exactly one sees a row come back. A read-then-write
        // here would let two callers both rotate.
        let updated = RefreshTokenEntity::update_many()
            .col_expr(RefreshTokenColumn::IsRevoked, Expr::value(true))
            .filter(RefreshTokenColumn::Token.eq(token))
            .filter(RefreshTokenColumn::IsRevoked.eq(false))
            .filter(RefreshTokenColumn::ExpiresAt.gt(Utc::now()))
            .exec_with_returning(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        Ok(updated.first().map(|row| row.user_id))
    }

    async fn revoke(&self, token: &str) -> Result<(), RefreshTokenStoreError> {
        RefreshTokenEntity::update_many()
            .col_expr(RefreshTokenColumn::IsRevoked, Expr::value(true))
            .filter(RefreshTokenColumn::Token.eq(token))
            .exec(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, RefreshTokenStoreError> {
        let result = RefreshTokenEntity::update_many()
            .col_expr(RefreshTokenColumn::IsRevoked, Expr::value(true))
            .filter(RefreshTokenColumn::UserId.eq(user_id))
            .filter(RefreshTokenColumn::IsRevoked.eq(false))
            .exec(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        Ok(result.rows_affected)
    }
}
