//! Postgres database clients acquiring pooled [`Connection`]s on demand.

use std::{future::Future, sync::Arc};

use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tokio_postgres::{Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{
        self,
        connection::{self, Params},
        Connection,
    },
};

/// Slot holding a lazily acquired [`Connection`].
#[derive(Debug)]
struct Slot<C>(RwLock<Option<C>>);

impl<C> Slot<C> {
    /// Creates a new empty [`Slot`].
    fn empty() -> Self {
        Self(RwLock::new(None))
    }

    /// Returns the [`Connection`] held in this [`Slot`], acquiring it with
    /// the provided `acquire` function if the [`Slot`] is empty.
    async fn get_or_acquire<F, Fut>(
        &self,
        acquire: F,
    ) -> Result<RwLockReadGuard<'_, C>, Traced<database::Error>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<C, Traced<database::Error>>>,
    {
        let held = self.0.read().await;
        let guard = if held.is_some() {
            held
        } else {
            drop(held);

            let mut held = self.0.write().await;
            if held.is_none() {
                *held = Some(acquire().await.map_err(tracerr::wrap!())?);
            }
            held.downgrade()
        };

        Ok(RwLockReadGuard::map(guard, |conn| {
            conn.as_ref()
                .expect("connection cannot be dropped while guard is alive")
        }))
    }

    /// Takes the [`Connection`] out of this [`Slot`], if any.
    async fn take(&self) -> Option<C> {
        self.0.write().await.take()
    }
}

/// Acquires a new [`connection::NonTx`] from the provided
/// [`connection::Pool`].
async fn acquire(
    pool: &connection::Pool,
) -> Result<connection::NonTx, Traced<database::Error>> {
    pool.get()
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}

/// Non-transactional Postgres database client.
///
/// Holds a single pooled [`Connection`] shared between its clones, acquired
/// on the first statement.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to acquire the [`Connection`] from.
    pool: connection::Pool,

    /// Acquired [`Connection`].
    connection: Arc<Slot<connection::NonTx>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client over the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            connection: Arc::new(Slot::empty()),
        }
    }

    /// Returns the [`connection::Pool`] this [`NonTx`] client acquires its
    /// [`Connection`] from.
    pub(crate) const fn pool(&self) -> &connection::Pool {
        &self.pool
    }

    /// Returns the [`Connection`] of this [`NonTx`] client.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::NonTx>, Traced<database::Error>>
    {
        self.connection.get_or_acquire(|| acquire(&self.pool)).await
    }
}

/// Transactional Postgres database client.
///
/// The transaction is opened on the first statement, reusing the
/// [`Connection`] of the [`NonTx`] client it was created from, if any.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`connection::Pool`] to acquire the [`Connection`] from.
    pool: connection::Pool,

    /// [`NonTx`] client whose [`Connection`] is reused by the transaction.
    origin: Arc<Mutex<Option<NonTx>>>,

    /// [`Connection`] with the open transaction.
    connection: Arc<Slot<connection::Tx>>,
}

impl Tx {
    /// Creates a new [`Tx`] client out of the provided [`NonTx`] client.
    #[must_use]
    pub fn new(origin: NonTx) -> Self {
        Self {
            pool: origin.pool.clone(),
            origin: Arc::new(Mutex::new(Some(origin))),
            connection: Arc::new(Slot::empty()),
        }
    }

    /// Returns the [`Connection`] of this [`Tx`] client, opening the
    /// transaction if it's not open yet.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        self.connection
            .get_or_acquire(|| async {
                let reused = match self.origin.lock().await.take() {
                    Some(origin) => origin.connection.take().await,
                    None => None,
                };
                let conn = if let Some(conn) = reused {
                    conn
                } else {
                    acquire(&self.pool).await.map_err(tracerr::wrap!())?
                };
                connection::Tx::begin(conn).await.map_err(tracerr::wrap!())
            })
            .await
    }

    /// Commits the transaction of this [`Tx`] client, if it was opened.
    ///
    /// The next statement opens a new transaction.
    ///
    /// # Errors
    ///
    /// If the transaction fails to commit.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        match self.connection.take().await {
            Some(tx) => tx.commit().await.map_err(tracerr::wrap!()),
            None => Ok(()),
        }
    }
}

/// Implements [`Connection`] for the provided client type by delegating to
/// the [`Connection`] it holds.
macro_rules! delegate_connection {
    ($client:ty) => {
        impl Connection for $client {
            async fn query<T>(
                &self,
                stmt: &T,
                params: &Params<'_>,
            ) -> Result<Vec<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn query_opt<T>(
                &self,
                stmt: &T,
                params: &Params<'_>,
            ) -> Result<Option<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query_opt(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn exec<T>(
                &self,
                stmt: &T,
                params: &Params<'_>,
            ) -> Result<u64, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .exec(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }
        }
    };
}

delegate_connection!(NonTx);
delegate_connection!(Tx);
