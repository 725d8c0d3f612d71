//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::db::repos::{AccountRepo, CategoryRepo, MemoryRepo, Repository, UserRepo};
use crate::models::{Account, Category, Entity, User};

/// Shared handle to the storage of one entity kind
pub struct Repo<E: Entity>(pub Arc<dyn Repository<E>>);

impl<E: Entity> Clone for Repo<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E: Entity> std::ops::Deref for Repo<E> {
    type Target = dyn Repository<E>;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    accounts: Repo<Account>,
    users: Repo<User>,
    categories: Repo<Category>,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn Repository<Account>>,
        users: Arc<dyn Repository<User>>,
        categories: Arc<dyn Repository<Category>>,
    ) -> Self {
        Self {
            accounts: Repo(accounts),
            users: Repo(users),
            categories: Repo(categories),
        }
    }

    /// PostgreSQL-backed state. The pool is shared by all three repositories.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(AccountRepo::new(pool.clone())),
            Arc::new(UserRepo::new(pool.clone())),
            Arc::new(CategoryRepo::new(pool)),
        )
    }

    /// Fresh, empty in-memory state.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryRepo::<Account>::new()),
            Arc::new(MemoryRepo::<User>::new()),
            Arc::new(MemoryRepo::<Category>::new()),
        )
    }

    pub fn accounts(&self) -> &Repo<Account> {
        &self.accounts
    }

    pub fn users(&self) -> &Repo<User> {
        &self.users
    }

    pub fn categories(&self) -> &Repo<Category> {
        &self.categories
    }
}

impl FromRef<AppState> for Repo<Account> {
    fn from_ref(state: &AppState) -> Self {
        state.accounts.clone()
    }
}

impl FromRef<AppState> for Repo<User> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for Repo<Category> {
    fn from_ref(state: &AppState) -> Self {
        state.categories.clone()
    }
}
