//! [`Command`] for deleting a [`SparePart`].

use common::operations::{By, Commit, Lock, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{spare_part, SparePart},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deactivating a [`SparePart`].
///
/// The [`SparePart`] stays referenced by past repairs.
#[derive(Clone, Copy, Debug)]
pub struct DeleteSparePart {
    /// ID of the [`SparePart`] to be deleted.
    pub spare_part_id: spare_part::Id,
}

impl<Db> Command<DeleteSparePart> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<SparePart, spare_part::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<SparePart>, spare_part::Id>>,
            Ok = Option<SparePart>,
            Err = Traced<database::Error>,
        > + Database<Update<SparePart>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = SparePart;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteSparePart,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteSparePart { spare_part_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<SparePart, _>::new(spare_part_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut part = tx
            .execute(Select(By::<Option<SparePart>, _>::new(spare_part_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|p| p.is_active)
            .ok_or(E::SparePartNotExists(spare_part_id))
            .map_err(tracerr::wrap!())?;

        part.is_active = false;
        part.touch();

        tx.execute(Update(part.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(part)
    }
}

/// Error of [`DeleteSparePart`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`SparePart`] with the provided ID does not exist.
    #[display("`SparePart(id: {_0})` does not exist")]
    SparePartNotExists(#[error(not(source))] spare_part::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        Money,
    };

    use super::{DeleteSparePart, ExecutionError};
    use crate::{
        domain::{fixture, SparePart},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    #[tokio::test]
    async fn deactivates_part_once() {
        let svc = Service::with_database(Memory::new());
        let part = fixture::spare_part(2, Money::from(100));
        svc.database().execute(Insert(part.clone())).await.unwrap();

        _ = svc
            .execute(DeleteSparePart {
                spare_part_id: part.id,
            })
            .await
            .unwrap();

        let stored = svc
            .database()
            .execute(Select(By::<Option<SparePart>, _>::new(part.id)))
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.is_active);
        assert_eq!(stored.stock_quantity, 2);

        let err = svc
            .execute(DeleteSparePart {
                spare_part_id: part.id,
            })
            .await
            .unwrap_err();
        assert!(
            matches!(err.as_ref(), ExecutionError::SparePartNotExists(_)),
            "unexpected error: {err}",
        );
    }
}
