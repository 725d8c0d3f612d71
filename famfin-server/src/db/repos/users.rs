//! User repository

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::{decode_variant, DbError, Repository};
use crate::db::session::UnitOfWork;
use crate::models::{Entity, NewUser, User, UserPatch, UserType};

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: i64,
    account_id: i64,
    #[sqlx(rename = "type")]
    kind: String,
    first_name: Option<String>,
    last_name: Option<String>,
    logo_url: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            account_id: row.account_id,
            kind: decode_variant::<UserType>("users", "type", row.kind)?,
            first_name: row.first_name,
            last_name: row.last_name,
            logo_url: row.logo_url,
        })
    }
}

/// User repository
#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<User> for UserRepo {
    async fn get(&self, id: i64) -> Result<User, DbError> {
        let row: UserRow = sqlx::query_as(
            r#"
            SELECT id, account_id, type, first_name, last_name, logo_url
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found::<User>(id))?;

        row.try_into()
    }

    async fn create(&self, new: NewUser) -> Result<User, DbError> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (account_id, type, first_name, last_name, logo_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, account_id, type, first_name, last_name, logo_url
            "#,
        )
        .bind(new.account_id)
        .bind(new.kind.as_str())
        .bind(new.first_name.as_deref())
        .bind(new.last_name.as_deref())
        .bind(new.logo_url.as_deref())
        .fetch_one(uow.conn())
        .await?;

        uow.commit().await?;
        tracing::info!(user_id = row.id, account_id = row.account_id, "user created");
        row.try_into()
    }

    async fn patch(&self, id: i64, patch: UserPatch) -> Result<User, DbError> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        let row: UserRow = sqlx::query_as(
            r#"
            SELECT id, account_id, type, first_name, last_name, logo_url
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(uow.conn())
        .await?
        .ok_or_else(|| DbError::not_found::<User>(id))?;

        let mut user = User::try_from(row)?;
        user.apply(patch);

        let row: UserRow = sqlx::query_as(
            r#"
            UPDATE users
            SET type = $2, first_name = $3, last_name = $4, logo_url = $5
            WHERE id = $1
            RETURNING id, account_id, type, first_name, last_name, logo_url
            "#,
        )
        .bind(id)
        .bind(user.kind.as_str())
        .bind(user.first_name.as_deref())
        .bind(user.last_name.as_deref())
        .bind(user.logo_url.as_deref())
        .fetch_one(uow.conn())
        .await?;

        uow.commit().await?;
        tracing::debug!(user_id = id, "user patched");
        row.try_into()
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found::<User>(id));
        }

        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}
