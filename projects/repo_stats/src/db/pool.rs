//! Connection pool lifecycle.
//!
//! The pool is built once in `main`, cloned into the router state, and
//! handed back to [`DbPool::shutdown`] after the server stops.

use std::time::Duration;

use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::PgConnection;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::info;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// A checked-out connection. Dropping it returns the connection to the pool.
pub type ScopedConnection = PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_size: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_size: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Error)]
pub enum InitializePoolError {
    #[error("InvalidDatabaseUrl: expected a postgres:// or postgresql:// URL")]
    InvalidDatabaseUrl,

    #[error("Connect: {source}")]
    Connect {
        #[source]
        source: r2d2::Error,
    },
}

#[derive(Debug, Error)]
pub enum AcquireConnectionError {
    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },
}

#[derive(Clone)]
pub struct DbPool {
    inner: PgPool,
}

impl DbPool {
    /// Builds the pool and opens its initial connections, failing if the
    /// database cannot be reached within `acquire_timeout`.
    pub fn initialize(
        database_url: &str,
        settings: &PoolSettings,
    ) -> Result<Self, InitializePoolError> {
        let manager = manager_for(database_url)?;
        let inner = builder(settings)
            .build(manager)
            .map_err(|source| InitializePoolError::Connect { source })?;

        let state = inner.state();
        info!(
            max_size = settings.max_size,
            connections = state.connections,
            "Database pool initialized"
        );

        Ok(Self { inner })
    }

    /// Builds the pool without connecting; connections open on first acquire.
    #[cfg(test)]
    pub(crate) fn initialize_lazy(
        database_url: &str,
        settings: &PoolSettings,
    ) -> Result<Self, InitializePoolError> {
        let manager = manager_for(database_url)?;
        let inner = builder(settings).build_unchecked(manager);
        Ok(Self { inner })
    }

    /// Blocks until a connection is free or `acquire_timeout` elapses.
    /// Call from blocking context only.
    pub fn acquire(&self) -> Result<ScopedConnection, AcquireConnectionError> {
        Ok(self.inner.get()?)
    }

    /// Runs `query` on a pooled connection inside `spawn_blocking`. The
    /// connection goes back to the pool when the closure returns, errors or
    /// panics; a panic surfaces as `E::from(JoinError)`.
    pub async fn run<T, E, F>(&self, query: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<AcquireConnectionError> + From<JoinError> + Send + 'static,
    {
        let pool = self.clone();
        tokio::task::spawn_blocking(move || -> Result<T, E> {
            let mut conn = pool.acquire()?;
            query(&mut *conn)
        })
        .await?
    }

    pub fn state(&self) -> r2d2::State {
        self.inner.state()
    }

    /// Releases this handle. Idle connections close as soon as no other
    /// clone of the pool remains.
    pub fn shutdown(self) {
        let state = self.inner.state();
        info!(
            connections = state.connections,
            idle = state.idle_connections,
            "Database pool shut down"
        );
        drop(self.inner);
    }
}

fn builder(settings: &PoolSettings) -> r2d2::Builder<ConnectionManager<PgConnection>> {
    Pool::builder()
        .max_size(settings.max_size)
        .connection_timeout(settings.acquire_timeout)
        .test_on_check_out(true)
}

fn manager_for(
    database_url: &str,
) -> Result<ConnectionManager<PgConnection>, InitializePoolError> {
    if !is_postgres_url(database_url) {
        return Err(InitializePoolError::InvalidDatabaseUrl);
    }
    Ok(ConnectionManager::<PgConnection>::new(database_url))
}

fn is_postgres_url(database_url: &str) -> bool {
    ["postgres://", "postgresql://"].iter().any(|scheme| {
        database_url
            .strip_prefix(scheme)
            .is_some_and(|rest| !rest.trim().is_empty())
    })
}
