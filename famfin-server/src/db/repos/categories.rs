//! Category repository
//!
//! Tags live in an `INTEGER[]` column; NULL and `{}` are kept distinct.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::{decode_variant, DbError, Repository};
use crate::db::session::UnitOfWork;
use crate::models::{Category, CategoryPatch, CategoryType, Entity, NewCategory};

#[derive(Debug, Clone, FromRow)]
struct CategoryRow {
    id: i64,
    account_id: i64,
    name: String,
    #[sqlx(rename = "type")]
    kind: String,
    logo_url: Option<String>,
    tags: Option<Vec<i32>>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = DbError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            account_id: row.account_id,
            name: row.name,
            kind: decode_variant::<CategoryType>("categories", "type", row.kind)?,
            logo_url: row.logo_url,
            tags: row.tags,
        })
    }
}

/// Category repository
#[derive(Clone)]
pub struct CategoryRepo {
    pool: PgPool,
}

impl CategoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Category> for CategoryRepo {
    async fn get(&self, id: i64) -> Result<Category, DbError> {
        let row: CategoryRow = sqlx::query_as(
            r#"
            SELECT id, account_id, name, type, logo_url, tags
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found::<Category>(id))?;

        row.try_into()
    }

    async fn create(&self, new: NewCategory) -> Result<Category, DbError> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        let row: CategoryRow = sqlx::query_as(
            r#"
            INSERT INTO categories (account_id, name, type, logo_url, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, account_id, name, type, logo_url, tags
            "#,
        )
        .bind(new.account_id)
        .bind(&new.name)
        .bind(new.kind.as_str())
        .bind(new.logo_url.as_deref())
        .bind(new.tags.as_deref())
        .fetch_one(uow.conn())
        .await?;

        uow.commit().await?;
        tracing::info!(
            category_id = row.id,
            account_id = row.account_id,
            "category created"
        );
        row.try_into()
    }

    async fn patch(&self, id: i64, patch: CategoryPatch) -> Result<Category, DbError> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        let row: CategoryRow = sqlx::query_as(
            r#"
            SELECT id, account_id, name, type, logo_url, tags
            FROM categories
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(uow.conn())
        .await?
        .ok_or_else(|| DbError::not_found::<Category>(id))?;

        let mut category = Category::try_from(row)?;
        category.apply(patch);

        let row: CategoryRow = sqlx::query_as(
            r#"
            UPDATE categories
            SET name = $2, type = $3, logo_url = $4, tags = $5
            WHERE id = $1
            RETURNING id, account_id, name, type, logo_url, tags
            "#,
        )
        .bind(id)
        .bind(&category.name)
        .bind(category.kind.as_str())
        .bind(category.logo_url.as_deref())
        .bind(category.tags.as_deref())
        .fetch_one(uow.conn())
        .await?;

        uow.commit().await?;
        tracing::debug!(category_id = id, "category patched");
        row.try_into()
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found::<Category>(id));
        }

        tracing::info!(category_id = id, "category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_keeps_empty_tags() {
        let row = CategoryRow {
            id: 2,
            account_id: 1,
            name: "Salary".into(),
            kind: "income".into(),
            logo_url: None,
            tags: Some(vec![]),
        };
        let category = Category::try_from(row).unwrap();
        assert_eq!(category.tags, Some(vec![]));
        assert_eq!(category.kind, CategoryType::Income);
    }
}
