//! Per-request unit of work
//!
//! A `UnitOfWork` wraps one pooled transaction. Commit is explicit; dropping
//! it on any other path (early `?` return, panic, cancelled request) rolls
//! back and hands the connection back to the pool.
//!
//! Single-statement reads and deletes run straight on the pool, where the
//! statement is its own autocommit unit.

use std::time::Instant;

use sqlx::{PgConnection, PgPool, Postgres, Transaction};

pub struct UnitOfWork {
    tx: Transaction<'static, Postgres>,
    started: Instant,
}

impl UnitOfWork {
    /// Acquire a connection and open a transaction on it.
    pub async fn begin(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let tx = pool.begin().await?;
        Ok(Self {
            tx,
            started: Instant::now(),
        })
    }

    /// Connection to run statements on.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await?;
        tracing::debug!(
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "unit of work committed"
        );
        Ok(())
    }
}
