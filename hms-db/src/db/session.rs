//! Scoped sessions over a connection source
//!
//! A [`Session`] exists only once a connection was actually acquired, and
//! hands that connection back to its source exactly once when dropped, on
//! the success path, the error path and during unwinding alike.

use async_trait::async_trait;
use futures::future::BoxFuture;
use sqlx::pool::PoolConnection;
use sqlx::{Connection, PgConnection, PgPool, Postgres};

use crate::config::DbConfig;
use crate::error::DbError;
use crate::Result;

/// Something that lends out connections and takes them back.
#[async_trait]
pub trait ConnectionSource: Send + Sync {
    type Connection: Send;

    async fn acquire(&self) -> Result<Self::Connection>;

    fn release(&self, conn: Self::Connection);
}

#[async_trait]
impl ConnectionSource for PgPool {
    type Connection = PoolConnection<Postgres>;

    async fn acquire(&self) -> Result<Self::Connection> {
        Ok(sqlx::Pool::acquire(self).await?)
    }

    fn release(&self, conn: Self::Connection) {
        // Dropping a PoolConnection returns it to the pool.
        drop(conn);
    }
}

/// One unit of work's connection.
pub struct Session<'p, S: ConnectionSource> {
    source: &'p S,
    conn: Option<S::Connection>,
}

impl<'p, S: ConnectionSource> Session<'p, S> {
    fn new(source: &'p S, conn: S::Connection) -> Self {
        Self {
            source,
            conn: Some(conn),
        }
    }

    pub fn conn(&mut self) -> &mut S::Connection {
        self.conn
            .as_mut()
            .expect("session connection is held until drop")
    }

    /// Release now instead of at end of scope.
    pub fn close(self) {}
}

impl<S: ConnectionSource> Drop for Session<'_, S> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.source.release(conn);
            tracing::trace!("session released");
        }
    }
}

impl Session<'_, PgPool> {
    /// Underlying Postgres connection, for repositories and raw queries.
    pub fn pg(&mut self) -> &mut PgConnection {
        self.conn()
    }
}

/// Hands out one session per unit of work.
pub struct SessionProvider<S> {
    source: S,
}

impl<S: ConnectionSource> SessionProvider<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Acquire a session; the caller owns its scope.
    pub async fn session(&self) -> Result<Session<'_, S>> {
        match self.source.acquire().await {
            Ok(conn) => Ok(Session::new(&self.source, conn)),
            Err(err) => Err(log_transient(err)),
        }
    }

    /// Run one unit of work on a fresh session.
    ///
    /// The session is released before the outcome is returned. A transient
    /// connectivity error is logged and returned as [`DbError::Transient`]
    /// so the caller may retry; every other error propagates unchanged.
    pub async fn run<'p, T, F>(&'p self, work: F) -> Result<T>
    where
        F: for<'s> FnOnce(&'s mut Session<'p, S>) -> BoxFuture<'s, Result<T>>,
    {
        let mut session = self.session().await?;
        let outcome = work(&mut session).await;
        drop(session);
        outcome.map_err(log_transient)
    }
}

impl SessionProvider<PgPool> {
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        Ok(Self::new(super::create_pool(config).await?))
    }

    pub fn pool(&self) -> &PgPool {
        &self.source
    }

    /// Run one unit of work inside a transaction.
    ///
    /// Commits on `Ok`, rolls back on `Err`. A failed rollback is logged and
    /// the unit of work's own error is returned.
    pub async fn transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: for<'t> FnOnce(&'t mut PgConnection) -> BoxFuture<'t, Result<T>>,
    {
        let mut session = self.session().await?;
        let outcome = in_transaction(session.pg(), work).await;
        drop(session);
        outcome.map_err(log_transient)
    }

    /// Close the pool, waiting for checked-out connections to come back.
    pub async fn close(&self) {
        self.source.close().await;
        tracing::info!("Database pool closed");
    }
}

/// Begin, run `work`, then commit or roll back. Every failure, including
/// one from `BEGIN` itself, is returned to the caller.
async fn in_transaction<T, F>(conn: &mut PgConnection, work: F) -> Result<T>
where
    F: for<'t> FnOnce(&'t mut PgConnection) -> BoxFuture<'t, Result<T>>,
{
    let mut tx = conn.begin().await?;

    match work(&mut *tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "rollback failed");
            }
            Err(err)
        }
    }
}

fn log_transient(err: DbError) -> DbError {
    if let DbError::Transient(reason) = &err {
        tracing::warn!(%reason, "database connection lost; unit of work may be retried");
    }
    err
}
