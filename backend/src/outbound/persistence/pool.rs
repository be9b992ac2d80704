//! Shared `bb8` pool of `diesel-async` PostgreSQL connections.
//!
//! Sizing comes from [`PoolSettings`], which the server derives from
//! `AppSettings`. Checkout waits at most `checkout_timeout`; a starved pool
//! surfaces through the repositories as a connection error, which the HTTP
//! layer reports as `service_unavailable`.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// The pool could not be built, or had no connection to hand out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("failed to get connection from pool: {0}")]
    Checkout(String),
    #[error("failed to build connection pool: {0}")]
    Build(String),
}

impl PoolError {
    /// Underlying cause, without the variant prefix.
    pub fn cause(&self) -> &str {
        match self {
            Self::Checkout(cause) | Self::Build(cause) => cause,
        }
    }
}

/// Validated pool sizing.
///
/// `max_size` and `checkout_timeout` are non-zero and `min_idle` never
/// exceeds `max_size`; `bb8` panics otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_size: u32,
    pub min_idle: u32,
    pub checkout_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_size: 10,
            min_idle: 2,
            checkout_timeout: Duration::from_secs(5),
        }
    }
}

/// Cloneable handle to the connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build a pool dialling `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the initial connections cannot be
    /// established.
    pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let inner = Pool::builder()
            .max_size(settings.max_size)
            .min_idle(Some(settings.min_idle))
            .connection_timeout(settings.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::Build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when nothing frees up before the
    /// checkout timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::Checkout(err.to_string()))
    }
}
