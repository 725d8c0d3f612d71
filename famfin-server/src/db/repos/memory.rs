//! In-memory repository for tests and local runs without PostgreSQL
//!
//! State is owned by the repository value, so every `AppState` built with
//! it starts empty. Ids increase monotonically and are never reused.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{DbError, Repository};
use crate::models::Entity;

struct Table<E> {
    rows: BTreeMap<i64, E>,
    next_id: i64,
}

/// Mutex-guarded map implementing `Repository<E>` for any entity kind
pub struct MemoryRepo<E> {
    table: Mutex<Table<E>>,
}

impl<E: Entity> MemoryRepo<E> {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<E: Entity> Default for MemoryRepo<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepo<E> {
    async fn get(&self, id: i64) -> Result<E, DbError> {
        let table = self.table.lock().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found::<E>(id))
    }

    async fn create(&self, new: E::New) -> Result<E, DbError> {
        let mut table = self.table.lock().await;
        let id = table.next_id;
        table.next_id += 1;

        let entity = E::create(id, new);
        table.rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn patch(&self, id: i64, patch: E::Patch) -> Result<E, DbError> {
        let mut table = self.table.lock().await;
        let entity = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found::<E>(id))?;

        entity.apply(patch);
        Ok(entity.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut table = self.table.lock().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::not_found::<E>(id))
    }
}
