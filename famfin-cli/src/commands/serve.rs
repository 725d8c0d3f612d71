//! HTTP server command
//!
//! Bootstraps the database (unless `--in-memory`) and serves the CRUD API.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;

use famfin_server::db::DEFAULT_MAX_CONNECTIONS;
use famfin_server::db::Bootstrapper;
use famfin_server::http::{run_server, ServerConfig};
use famfin_server::AppState;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind to
    #[arg(long, env = "FAMFIN_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind to
    #[arg(long, short = 'p', env = "FAMFIN_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Keep records in process memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub in_memory: bool,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            cors_permissive: self.cors_permissive,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.server_config();

    let (state, pool) = if args.in_memory {
        tracing::warn!("Using in-memory storage; data will not survive a restart");
        (AppState::in_memory(), None)
    } else {
        let pool = Bootstrapper::from_env()
            .context("Database configuration incomplete")?
            .max_connections(args.max_connections)
            .run()
            .await
            .context("Database bootstrap failed")?;
        (AppState::postgres(pool.clone()), Some(pool))
    };

    tracing::info!("Starting famfin server on {}", config.bind_addr);

    // Blocks until shutdown
    let result = run_server(state, config).await.context("Server error");

    if let Some(pool) = pool {
        pool.close().await;
    }
    result
}
