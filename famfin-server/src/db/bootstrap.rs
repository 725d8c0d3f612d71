//! Database bootstrap
//!
//! Uninitialized (`Bootstrapper`) -> Ready (`PgPool`):
//! 1. connect to the maintenance database and create the target database
//!    if `pg_database` has no row for it
//! 2. open the application pool
//! 3. create any missing tables
//!
//! Two processes bootstrapping at once may both see the database as absent.
//! The loser's `CREATE DATABASE` fails with duplicate_database (or a
//! unique_violation on the catalog); that outcome is treated as success.

use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection, PgPool};

use super::schema;
use crate::config::{ConfigError, DatabaseConfig};

/// Pool size unless overridden with `max_connections`
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// duplicate_database
const SQLSTATE_DUPLICATE_DATABASE: &str = "42P04";
/// unique_violation, raised on `pg_database_datname_index` under a race
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not connect to the maintenance database: {0}")]
    AdminConnect(#[source] sqlx::Error),

    #[error("could not create database '{name}': {source}")]
    CreateDatabase {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("could not open database pool: {0}")]
    Pool(#[source] sqlx::Error),

    #[error("could not create tables: {0}")]
    Schema(#[source] sqlx::Error),
}

/// Whether `ensure_database` had to create the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseStatus {
    Existing,
    Created,
    /// Another process created it between our check and our CREATE
    CreatedConcurrently,
}

/// Uninitialized bootstrap state
#[derive(Debug, Clone)]
pub struct Bootstrapper {
    config: DatabaseConfig,
    max_connections: u32,
}

impl Bootstrapper {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Resolve configuration from the environment, failing fast on missing
    /// variables.
    pub fn from_env() -> Result<Self, BootstrapError> {
        Ok(Self::new(DatabaseConfig::from_env()?))
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Run the full bootstrap and hand back a ready pool.
    pub async fn run(self) -> Result<PgPool, BootstrapError> {
        let status = ensure_database(&self.config).await?;
        tracing::info!(
            database = %self.config.database,
            host = %self.config.host,
            port = self.config.port,
            ?status,
            "database available"
        );

        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(self.config.connect_options())
            .await
            .map_err(BootstrapError::Pool)?;

        schema::ensure_tables(&pool)
            .await
            .map_err(BootstrapError::Schema)?;

        tracing::info!("bootstrap complete");
        Ok(pool)
    }
}

/// Create the configured database if it does not exist yet.
pub async fn ensure_database(config: &DatabaseConfig) -> Result<DatabaseStatus, BootstrapError> {
    let mut conn = PgConnection::connect_with(&config.admin_options())
        .await
        .map_err(BootstrapError::AdminConnect)?;

    let create_err = |source| BootstrapError::CreateDatabase {
        name: config.database.clone(),
        source,
    };

    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(&config.database)
        .fetch_optional(&mut conn)
        .await
        .map_err(create_err)?;

    let status = if exists.is_some() {
        DatabaseStatus::Existing
    } else {
        tracing::info!(database = %config.database, "creating database");
        let statement = format!("CREATE DATABASE {}", quote_ident(&config.database));
        match sqlx::raw_sql(&statement).execute(&mut conn).await {
            Ok(_) => DatabaseStatus::Created,
            Err(e) if is_already_exists(&e) => {
                tracing::warn!(
                    database = %config.database,
                    error = %e,
                    "database was created concurrently; continuing"
                );
                DatabaseStatus::CreatedConcurrently
            }
            Err(e) => return Err(create_err(e)),
        }
    };

    if let Err(e) = conn.close().await {
        tracing::debug!(error = %e, "closing maintenance connection failed");
    }

    Ok(status)
}

fn is_already_exists(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => matches!(
            db_err.code().as_deref(),
            Some(SQLSTATE_DUPLICATE_DATABASE) | Some(SQLSTATE_UNIQUE_VIOLATION)
        ),
        _ => false,
    }
}

/// Quote a PostgreSQL identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
