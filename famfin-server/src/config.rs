//! Database configuration - environment loading
//!
//! Configuration is loaded from environment variables:
//! - `POSTGRESQL_USER` (required)
//! - `POSTGRESQL_PASSWORD` (required)
//! - `POSTGRESQL_DB` (required)
//! - `POSTGRESQL_HOST` (default: localhost)
//! - `POSTGRESQL_PORT` (default: 5432)

use std::fmt;

use sqlx::postgres::PgConnectOptions;

pub const ENV_USER: &str = "POSTGRESQL_USER";
pub const ENV_PASSWORD: &str = "POSTGRESQL_PASSWORD";
pub const ENV_DB: &str = "POSTGRESQL_DB";
pub const ENV_HOST: &str = "POSTGRESQL_HOST";
pub const ENV_PORT: &str = "POSTGRESQL_PORT";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;

/// Maintenance database used for the administrative connection
pub const ADMIN_DATABASE: &str = "postgres";

/// Configuration error, fatal at startup
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .vars.join(", "))]
    Missing { vars: Vec<&'static str> },

    #[error("invalid {var} value '{value}': expected a port number")]
    InvalidPort { var: &'static str, value: String },
}

/// PostgreSQL connection parameters
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl DatabaseConfig {
    /// Create config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (for testing).
    ///
    /// Empty values count as missing. Every missing required variable is
    /// reported, not just the first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let user = get(ENV_USER);
        let password = get(ENV_PASSWORD);
        let database = get(ENV_DB);

        let (user, password, database) = match (user, password, database) {
            (Some(user), Some(password), Some(database)) => (user, password, database),
            (user, password, database) => {
                let vars = [
                    (ENV_USER, user.is_none()),
                    (ENV_PASSWORD, password.is_none()),
                    (ENV_DB, database.is_none()),
                ]
                .into_iter()
                .filter_map(|(var, missing)| missing.then_some(var))
                .collect();
                return Err(ConfigError::Missing { vars });
            }
        };

        let host = get(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match get(ENV_PORT) {
            None => DEFAULT_PORT,
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
                var: ENV_PORT,
                value: value.clone(),
            })?,
        };

        Ok(Self {
            user,
            password,
            database,
            host,
            port,
        })
    }

    /// Options for the application database.
    pub fn connect_options(&self) -> PgConnectOptions {
        self.options_for(&self.database)
    }

    /// Options for the maintenance database, used to create the
    /// application database.
    pub fn admin_options(&self) -> PgConnectOptions {
        self.options_for(ADMIN_DATABASE)
    }

    fn options_for(&self, database: &str) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(database)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
