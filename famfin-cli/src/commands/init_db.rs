//! Database bootstrap command
//!
//! Creates the database and tables, then exits. Safe to run repeatedly.

use anyhow::{Context, Result};
use clap::Parser;

use famfin_server::db::Bootstrapper;

#[derive(Parser, Debug)]
pub struct InitDbArgs {
    /// Maximum pool connections used during bootstrap
    #[arg(long, default_value_t = 1)]
    pub max_connections: u32,
}

pub async fn run_init_db(args: InitDbArgs) -> Result<()> {
    let bootstrapper = Bootstrapper::from_env()
        .context("Database configuration incomplete")?
        .max_connections(args.max_connections);

    let database = bootstrapper.config().database.clone();
    let pool = bootstrapper
        .run()
        .await
        .context("Database bootstrap failed")?;
    pool.close().await;

    println!("Database '{}' is ready", database);
    Ok(())
}
