//! Account repository
//!
//! - create: status is always written as pending
//! - patch: SELECT ... FOR UPDATE, apply changeset, UPDATE ... RETURNING

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::{decode_variant, DbError, Repository};
use crate::db::session::UnitOfWork;
use crate::models::{Account, AccountPatch, AccountStatus, Email, Entity, NewAccount};

/// Account record from database
#[derive(Debug, Clone, FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    google_id: Option<String>,
    status: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = DbError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            email: Email::from_trusted(row.email),
            google_id: row.google_id,
            status: decode_variant::<AccountStatus>("accounts", "status", row.status)?,
        })
    }
}

/// Account repository
#[derive(Clone)]
pub struct AccountRepo {
    pool: PgPool,
}

impl AccountRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Account> for AccountRepo {
    async fn get(&self, id: i64) -> Result<Account, DbError> {
        let row: AccountRow = sqlx::query_as(
            r#"
            SELECT id, email, google_id, status
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found::<Account>(id))?;

        row.try_into()
    }

    async fn create(&self, new: NewAccount) -> Result<Account, DbError> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        let row: AccountRow = sqlx::query_as(
            r#"
            INSERT INTO accounts (email, google_id, status)
            VALUES ($1, $2, $3)
            RETURNING id, email, google_id, status
            "#,
        )
        .bind(new.email.as_str())
        .bind(new.google_id.as_deref())
        .bind(AccountStatus::Pending.as_str())
        .fetch_one(uow.conn())
        .await?;

        uow.commit().await?;
        tracing::info!(account_id = row.id, "account created");
        row.try_into()
    }

    async fn patch(&self, id: i64, patch: AccountPatch) -> Result<Account, DbError> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        let row: AccountRow = sqlx::query_as(
            r#"
            SELECT id, email, google_id, status
            FROM accounts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(uow.conn())
        .await?
        .ok_or_else(|| DbError::not_found::<Account>(id))?;

        let mut account = Account::try_from(row)?;
        account.apply(patch);

        let row: AccountRow = sqlx::query_as(
            r#"
            UPDATE accounts
            SET email = $2, google_id = $3, status = $4
            WHERE id = $1
            RETURNING id, email, google_id, status
            "#,
        )
        .bind(id)
        .bind(account.email.as_str())
        .bind(account.google_id.as_deref())
        .bind(account.status.as_str())
        .fetch_one(uow.conn())
        .await?;

        uow.commit().await?;
        tracing::debug!(account_id = id, "account patched");
        row.try_into()
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found::<Account>(id));
        }

        tracing::info!(account_id = id, "account deleted");
        Ok(())
    }
}
