//! Table DDL
//!
//! Create-if-missing only. Existing tables are never dropped or altered;
//! there is no migration layer. No foreign keys: `account_id` is a loose
//! reference and deleting an account leaves its users and categories.

use sqlx::PgPool;

pub const CREATE_ACCOUNTS: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id BIGSERIAL PRIMARY KEY,
    email TEXT NOT NULL,
    google_id TEXT,
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('verified', 'pending', 'suspended'))
)
"#;

pub const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    account_id BIGINT NOT NULL,
    type TEXT NOT NULL
        CHECK (type IN ('family_manager', 'family_member', 'financial_professional')),
    first_name TEXT,
    last_name TEXT,
    logo_url TEXT
)
"#;

pub const CREATE_CATEGORIES: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id BIGSERIAL PRIMARY KEY,
    account_id BIGINT NOT NULL,
    name TEXT NOT NULL,
    type TEXT NOT NULL
        CHECK (type IN ('expense', 'income', 'transfer')),
    logo_url TEXT,
    tags INTEGER[]
)
"#;

/// Every declared table, in creation order
pub const TABLES: &[(&str, &str)] = &[
    ("accounts", CREATE_ACCOUNTS),
    ("users", CREATE_USERS),
    ("categories", CREATE_CATEGORIES),
];

/// Ensure all declared tables exist.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Ensuring table schemas...");

    for (table, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await?;
        tracing::debug!(table, "table ready");
    }

    Ok(())
}
