//! In-memory [`Database`] implementation.
//!
//! Keeps everything in a single [`State`]. A [`Tx`] holds the [`State`]
//! exclusively from its first operation until [`Commit`], working on a copy
//! which is written back on [`Commit`] and discarded on drop. So transactions
//! are fully serialized, and using a non-transactional [`Memory`] while a
//! [`Tx`] of it is in flight waits for that [`Tx`] to finish.

mod impls;

use std::{collections::HashMap, future::Future, sync::Arc};

use common::operations::{Commit, Transact};
use derive_more::Deref;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{
        customer, repair, sequence, spare_part, transaction, user, vehicle,
        Customer, Repair, SparePart, StockMovement, User, Vehicle,
    },
    infra::{database, Database},
};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Memory<A = NonTx>(A);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self(NonTx::default())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole data of a [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Stored [`Vehicle`]s.
    pub(crate) vehicles: HashMap<vehicle::Id, Vehicle>,

    /// Stored [`Customer`]s.
    pub(crate) customers: HashMap<customer::Id, Customer>,

    /// Stored [`User`]s.
    pub(crate) users: HashMap<user::Id, User>,

    /// Stored [`SparePart`]s.
    pub(crate) spare_parts: HashMap<spare_part::Id, SparePart>,

    /// Stored [`Repair`]s.
    pub(crate) repairs: HashMap<repair::Id, Repair>,

    /// Stored [`repair::Part`]s.
    pub(crate) repair_parts: HashMap<repair::part::Id, repair::Part>,

    /// Stored [`transaction::Purchase`]s.
    pub(crate) purchases: HashMap<transaction::purchase::Id, transaction::Purchase>,

    /// Stored [`transaction::Sale`]s.
    pub(crate) sales: HashMap<transaction::sale::Id, transaction::Sale>,

    /// Journal of [`StockMovement`]s in insertion order.
    pub(crate) stock_movements: Vec<StockMovement>,

    /// Current values of counters.
    pub(crate) sequences: HashMap<sequence::Key, u32>,
}

/// Access to a [`State`].
pub trait Access {
    /// Runs the provided function over the [`State`].
    fn with<R>(
        &self,
        f: impl FnOnce(&mut State) -> R,
    ) -> impl Future<Output = R>;
}

/// Non-transactional [`Memory`] client, applying every operation right away.
#[derive(Clone, Debug, Default)]
pub struct NonTx(Arc<Mutex<State>>);

impl Access for NonTx {
    async fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut *self.0.lock().await)
    }
}

/// Transactional [`Memory`] client.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`State`] the transaction is started over.
    root: Arc<Mutex<State>>,

    /// Lazily started transaction.
    inner: Arc<Mutex<Option<Inner>>>,
}

/// Started transaction of a [`Tx`] client.
#[derive(Debug)]
struct Inner {
    /// Exclusive access to the original [`State`].
    original: OwnedMutexGuard<State>,

    /// Copy of the [`State`] the operations are applied to.
    working: State,
}

impl Tx {
    /// Creates a new [`Tx`] client over the [`State`] of the provided
    /// [`NonTx`] one.
    #[must_use]
    pub fn from_non_tx(client: &NonTx) -> Self {
        Self {
            root: Arc::clone(&client.0),
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// Writes the changes made by this [`Tx`] back.
    ///
    /// Next time this [`Tx`] is used, it starts a new transaction.
    pub async fn commit(&self) {
        if let Some(Inner {
            mut original,
            working,
        }) = self.inner.lock().await.take()
        {
            *original = working;
        }
    }
}

impl Access for Tx {
    async fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut slot = self.inner.lock().await;
        let inner = match slot.take() {
            Some(inner) => inner,
            None => {
                let original = Arc::clone(&self.root).lock_owned().await;
                let working = original.clone();
                Inner { original, working }
            }
        };
        f(&mut slot.insert(inner).working)
    }
}

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Memory(Tx::from_non_tx(&self.0)))
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await;
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Commit, Insert, Select, Transact},
        Money,
    };

    use super::Memory;
    use crate::{
        domain::{fixture, SparePart},
        infra::Database as _,
    };

    #[tokio::test]
    async fn commits_transaction() {
        let db = Memory::new();
        let part = fixture::spare_part(1, Money::from(10));

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(part.clone())).await.unwrap();
        tx.execute(Commit).await.unwrap();
        drop(tx);

        let stored = db
            .execute(Select(By::<Option<SparePart>, _>::new(part.id)))
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn discards_uncommitted_transaction() {
        let db = Memory::new();
        let part = fixture::spare_part(1, Money::from(10));

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(part.clone())).await.unwrap();
        let seen = tx
            .execute(Select(By::<Option<SparePart>, _>::new(part.id)))
            .await
            .unwrap();
        assert!(seen.is_some());
        drop(tx);

        let stored = db
            .execute(Select(By::<Option<SparePart>, _>::new(part.id)))
            .await
            .unwrap();
        assert!(stored.is_none());
    }
}
