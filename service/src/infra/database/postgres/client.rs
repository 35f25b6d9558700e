//! Postgres clients and the [`Connection`] they provide.

use std::{fmt, future::Future, sync::Arc};

use futures::{FutureExt as _, TryFutureExt as _};
use ouroboros::self_referencing;
use tokio::sync::{Mutex, MutexGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{self, postgres};

pub use deadpool_postgres::{
    CreatePoolError as PoolCreationError, Object as Pooled, Pool, PoolError,
};
pub use tokio_postgres::Error as ConnectionError;

/// Connection statements are executed on.
pub trait Connection {
    /// Queries the provided statement and returns all the resulting rows.
    ///
    /// # Errors
    ///
    /// If the statement fails.
    fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Vec<Row>, Traced<database::Error>>>
    where
        T: ToStatement + ?Sized;

    /// Queries the provided statement and returns at most one resulting row.
    ///
    /// # Errors
    ///
    /// If the statement fails or returns more than one row.
    fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Option<Row>, Traced<database::Error>>>
    where
        T: ToStatement + ?Sized;

    /// Executes the provided statement and returns the number of affected
    /// rows.
    ///
    /// # Errors
    ///
    /// If the statement fails.
    fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<u64, Traced<database::Error>>>
    where
        T: ToStatement + ?Sized;
}

/// Non-transactional client.
///
/// Every statement runs in its own implicit transaction on a [`Pooled`]
/// connection, which is returned to the [`Pool`] right after it.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`Pool`] of the connections.
    pool: Pool,
}

impl NonTx {
    /// Creates a new [`NonTx`] client on top of the provided [`Pool`].
    #[must_use]
    pub(crate) const fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    /// Borrows a [`Pooled`] connection from the [`Pool`].
    ///
    /// # Errors
    ///
    /// If the [`Pool`] fails to provide one.
    pub(crate) async fn pooled(&self) -> Result<Pooled, Traced<database::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl Connection for NonTx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.pooled()
            .await
            .map_err(tracerr::wrap!())?
            .query(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.pooled()
            .await
            .map_err(tracerr::wrap!())?
            .query_opt(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.pooled()
            .await
            .map_err(tracerr::wrap!())?
            .execute(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

/// Transactional client.
///
/// The transaction begins on the first statement and keeps its [`Pooled`]
/// connection until [`Tx::commit()`]. Row locks taken by the statements are
/// held until then as well. Dropping the last clone of an uncommitted [`Tx`]
/// rolls the transaction back.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`Pool`] to borrow the connection from.
    pool: Pool,

    /// Lazily begun [`Transaction`].
    ///
    /// Statements of a single [`Tx`] run one after another.
    tx: Arc<Mutex<Option<Transaction>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client borrowing its connection from the same
    /// [`Pool`] as the provided [`NonTx`] client.
    #[must_use]
    pub fn from_non_tx(client: &NonTx) -> Self {
        Self {
            pool: client.pool.clone(),
            tx: Arc::new(Mutex::new(None)),
        }
    }

    /// Locks this [`Tx`] for the next statement, beginning its
    /// [`Transaction`] if there is none yet.
    async fn begun(
        &self,
    ) -> Result<MutexGuard<'_, Option<Transaction>>, Traced<database::Error>>
    {
        let mut guard = self.tx.lock().await;
        if guard.is_none() {
            let pooled = self
                .pool
                .get()
                .await
                .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                .map_err(tracerr::map_from)?;
            *guard = Some(
                Transaction::begin(pooled)
                    .await
                    .map_err(tracerr::wrap!())?,
            );
        }
        Ok(guard)
    }

    /// Commits this [`Tx`].
    ///
    /// Committing a [`Tx`] without any statement executed is a no-op.
    ///
    /// # Errors
    ///
    /// If the database fails to commit.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Some(tx) = self.tx.lock().await.take() else {
            return Ok(());
        };
        tx.commit().await.map_err(tracerr::wrap!())
    }
}

impl Connection for Tx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let guard = self.begun().await.map_err(tracerr::wrap!())?;
        Transaction::of(&guard)
            .query(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let guard = self.begun().await.map_err(tracerr::wrap!())?;
        Transaction::of(&guard)
            .query_opt(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let guard = self.begun().await.map_err(tracerr::wrap!())?;
        Transaction::of(&guard)
            .execute(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

/// Begun database transaction owning its [`Pooled`] connection.
#[self_referencing]
struct Transaction {
    /// [`Pooled`] connection the transaction runs on.
    pooled: Pooled,

    /// Transaction itself, [`None`] once committed.
    #[borrows(mut pooled)]
    #[not_covariant]
    inner: Option<deadpool_postgres::Transaction<'this>>,
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("is_committed", &self.with_inner(|tx| tx.is_none()))
            .finish_non_exhaustive()
    }
}

impl Transaction {
    /// Returns the begun transaction guarded by the provided [`MutexGuard`].
    fn of<'g>(
        guard: &'g MutexGuard<'_, Option<Self>>,
    ) -> &'g deadpool_postgres::Transaction<'g> {
        guard
            .as_ref()
            .expect("begun before locking")
            .with_inner(|tx| tx.as_ref().expect("not committed yet"))
    }

    /// Begins a new [`Transaction`] on the provided [`Pooled`] connection.
    async fn begin(pooled: Pooled) -> Result<Self, Traced<database::Error>> {
        Self::try_new_async_send(pooled, |c| {
            c.transaction().map_ok(Some).boxed()
        })
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
    }

    /// Commits this [`Transaction`].
    async fn commit(mut self) -> Result<(), Traced<database::Error>> {
        #[expect(
            clippy::redundant_closure_for_method_calls,
            reason = "closure is generic over the borrowed lifetime"
        )]
        let Some(tx) = self.with_inner_mut(|tx| tx.take()) else {
            return Ok(());
        };
        tx.commit()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}
