//! Postgres database client definitions.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection},
};

/// Non-transactional Postgres database client.
///
/// Lazily acquires a single pooled [`connection::NonTx`] on first use.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to initialize the client.
    pub(crate) pool: connection::Pool,

    /// Client to be used for non-transactional operations, if any.
    connection: Arc<RwLock<Option<connection::NonTx>>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client from the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            connection: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the underlying [`connection::NonTx`] of this client.
    pub(crate) async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::NonTx>, Traced<database::Error>>
    {
        let connection = self.connection.read().await;
        let guard = if connection.is_none() {
            drop(connection);

            let mut connection = self.connection.write().await;
            if connection.is_none() {
                *connection = Some(
                    self.pool
                        .get()
                        .await
                        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                        .map_err(tracerr::map_from)?,
                );
            }

            connection.downgrade()
        } else {
            connection
        };

        Ok(RwLockReadGuard::map(guard, |conn| {
            conn.as_ref()
                .expect("connection cannot be dropped while guard is alive")
        }))
    }

    /// Takes the underlying [`connection::NonTx`] from this client.
    ///
    /// Next time this client is used, it will acquire a new one.
    pub(crate) async fn take_connection(&self) -> Option<connection::NonTx> {
        self.connection.write().await.take()
    }
}

/// Transactional Postgres database client.
///
/// The transaction is started lazily, reusing the [`connection::NonTx`] of
/// the [`NonTx`] client it was created from, if any.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`connection::Pool`] to retrieve a [`connection::NonTx`] from.
    pool: connection::Pool,

    /// [`NonTx`] client to take the [`connection::NonTx`] from, if any.
    non_tx: Arc<RwLock<Option<NonTx>>>,

    /// Lazily started [`connection::Tx`].
    tx: Arc<RwLock<Option<connection::Tx>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client from the provided [`NonTx`] client.
    #[must_use]
    pub fn from_non_tx(client: NonTx) -> Self {
        Self {
            pool: client.pool.clone(),
            non_tx: Arc::new(RwLock::new(Some(client))),
            tx: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the underlying [`connection::Tx`] of this client.
    pub(crate) async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        let connection = self.tx.read().await;
        let guard = if connection.is_none() {
            drop(connection);

            let mut connection = self.tx.write().await;
            if connection.is_none() {
                let existing = match self.non_tx.write().await.take() {
                    Some(cl) => cl.take_connection().await,
                    None => None,
                };
                let conn = match existing {
                    Some(c) => c,
                    None => self
                        .pool
                        .get()
                        .await
                        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                        .map_err(tracerr::map_from)?,
                };

                *connection = Some(
                    connection::Tx::from_non_tx(conn)
                        .await
                        .map_err(tracerr::wrap!())?,
                );
            }

            connection.downgrade()
        } else {
            connection
        };

        Ok(RwLockReadGuard::map(guard, |conn| {
            conn.as_ref()
                .expect("connection cannot be dropped while guard is alive")
        }))
    }

    /// Commits this [`Tx`] client.
    ///
    /// Nothing is done if no statement has been executed yet.
    ///
    /// # Errors
    ///
    /// If failed to commit the transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        match self.tx.write().await.take() {
            Some(tx) => tx.commit().await.map_err(tracerr::wrap!()),
            None => Ok(()),
        }
    }
}
