//! Repository implementations for database access
//!
//! Each entity kind is stored behind `Repository<E>`. The PostgreSQL
//! repositories follow these patterns:
//! - One unit of work per call, committed before returning
//! - Read-modify-write under a row lock for patches
//! - Store-assigned ids via `RETURNING`

pub mod accounts;
pub mod users;
pub mod categories;
pub mod memory;

use async_trait::async_trait;
use serde::de::{self, DeserializeOwned, IntoDeserializer};
use serde::Deserialize;

use crate::models::Entity;

pub use accounts::AccountRepo;
pub use users::UserRepo;
pub use categories::CategoryRepo;
pub use memory::MemoryRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: i64 },

    #[error("unexpected value '{value}' in {table}.{column}")]
    Corrupt {
        table: &'static str,
        column: &'static str,
        value: String,
    },
}

impl DbError {
    pub fn not_found<E: Entity>(id: i64) -> Self {
        Self::NotFound {
            resource: E::KIND,
            id,
        }
    }
}

/// Storage for one entity kind.
///
/// Validation happens before these calls: `create` and `patch` receive
/// typed payloads that are already known to be well-formed.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Fetch by id, or `NotFound`.
    async fn get(&self, id: i64) -> Result<E, DbError>;

    /// Insert and return the stored entity with its assigned id.
    async fn create(&self, new: E::New) -> Result<E, DbError>;

    /// Apply a changeset atomically and return the full updated entity.
    /// An empty changeset returns the entity unchanged.
    async fn patch(&self, id: i64, patch: E::Patch) -> Result<E, DbError>;

    /// Hard delete, or `NotFound` if there is nothing to delete.
    async fn delete(&self, id: i64) -> Result<(), DbError>;
}

/// Decode a stored enum name, reporting unknown values as corruption.
pub(crate) fn decode_variant<V: DeserializeOwned>(
    table: &'static str,
    column: &'static str,
    value: String,
) -> Result<V, DbError> {
    V::deserialize(value.as_str().into_deserializer()).map_err(|_: de::value::Error| {
        DbError::Corrupt {
            table,
            column,
            value: value.clone(),
        }
    })
}
