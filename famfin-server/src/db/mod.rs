//! Database layer - bootstrap, connection pool, sessions, repositories
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections by default)
//! - One unit of work per request, released on every path
//! - Create-if-missing schema, no migrations
//! - Storage behind `Repository<E>` so handlers never see the pool

pub mod bootstrap;
pub mod repos;
pub mod schema;
pub mod session;

pub use bootstrap::{Bootstrapper, BootstrapError, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;
pub use session::UnitOfWork;
