//! Postgres-backed [`Database`] for listings, inquiries and users.

pub mod client;
pub mod connection;
mod impls;
mod like_pattern;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
    like_pattern::LikePattern,
};

pub use deadpool_postgres::Config;

/// Postgres [`Database`] client.
#[derive(Clone, Copy, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create a new [`Postgres`] client.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Statement failed on an established [`Connection`].
    #[display("Statement failed: {_0}")]
    Connection(connection::Error),

    /// [`connection::Pool`] could not be built from the [`Config`].
    #[display("Invalid pool configuration: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// No connection could be checked out of the [`connection::Pool`].
    #[display("Pool exhausted or unreachable: {_0}")]
    PoolError(connection::PoolError),
}

impl Error {
    /// Checks whether a statement was rejected by a unique constraint.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Connection(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION),
        )
    }
}
