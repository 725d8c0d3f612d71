//! famfin-server: family-finance CRUD backend
//!
//! Accounts, users and categories stored in PostgreSQL and exposed over
//! JSON/HTTP. The database and tables are created on first start.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use config::{ConfigError, DatabaseConfig};
pub use db::{BootstrapError, Bootstrapper};
pub use http::{build_router, run_server, ServerConfig, ServerError};
pub use state::AppState;

