//! Postgres [`Database`] implementation of the showroom storage.

pub mod client;
mod fuzz_pattern;
mod impls;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::NoTls;
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use deadpool_postgres::{Config, PoolConfig};
pub use refinery::embed_migrations;

pub use self::{
    client::{Connection, NonTx, Tx},
    fuzz_pattern::FuzzPattern,
};

/// Postgres [`Database`] of the showroom.
///
/// Wraps either a [`NonTx`] client, or a [`Tx`] one once a transaction has
/// been requested.
#[derive(Clone, Copy, Debug, Deref)]
pub struct Postgres<C = NonTx>(C);

impl Postgres {
    /// Creates a new [`Postgres`] database connecting with the provided
    /// [`Config`].
    ///
    /// No connection is established until the first statement.
    ///
    /// # Errors
    ///
    /// If the connection [`client::Pool`] cannot be created out of the
    /// provided [`Config`].
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        conf.create_pool(Some(Runtime::Tokio1), NoTls)
            .map(|pool| Self(NonTx::from_pool(pool)))
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// Error of the [`Postgres`] database.
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Statement failed on the database side.
    #[display("Postgres statement failed: {_0}")]
    Connection(client::ConnectionError),

    /// [`client::Pool`] cannot be created.
    #[display("Cannot create Postgres pool: {_0}")]
    PoolCreationError(client::PoolCreationError),

    /// [`client::Pool`] failed to provide a connection.
    #[display("Postgres pool failed: {_0}")]
    PoolError(client::PoolError),
}

impl Error {
    /// Checks whether this [`Error`] is caused by the database being
    /// temporarily unable to serve, rather than by the statement itself.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::PoolError(
                client::PoolError::Timeout(_) | client::PoolError::Closed,
            )
        )
    }
}
