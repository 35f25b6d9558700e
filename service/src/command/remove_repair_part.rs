//! [`Command`] for removing a [`repair::Part`] line from a [`Repair`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        repair, spare_part, stock_movement, Repair, SparePart, StockMovement,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for removing a [`repair::Part`] line from a [`Repair`].
///
/// The consumed units go back to the stock, and the [`Repair`] costs are
/// recomputed out of its remaining lines.
#[derive(Clone, Copy, Debug)]
pub struct RemoveRepairPart {
    /// ID of the [`Repair`] to remove the line from.
    pub repair_id: repair::Id,

    /// ID of the [`repair::Part`] line to be removed.
    pub part_id: repair::part::Id,
}

impl<Db> Command<RemoveRepairPart> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Repair, repair::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Repair>, repair::Id>>,
            Ok = Option<Repair>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<repair::Part>, repair::part::Id>>,
            Ok = Option<repair::Part>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<repair::Part>, repair::Id>>,
            Ok = Vec<repair::Part>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<repair::Part, repair::part::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Repair>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<SparePart, spare_part::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<SparePart>, spare_part::Id>>,
            Ok = Option<SparePart>,
            Err = Traced<database::Error>,
        > + Database<Update<SparePart>, Err = Traced<database::Error>>
        + Database<Insert<StockMovement>, Err = Traced<database::Error>>,
{
    type Ok = Repair;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RemoveRepairPart,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RemoveRepairPart { repair_id, part_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Repair, _>::new(repair_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut repair = tx
            .execute(Select(By::<Option<Repair>, _>::new(repair_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RepairNotExists(repair_id))
            .map_err(tracerr::wrap!())?;

        let part = tx
            .execute(Select(By::<Option<repair::Part>, _>::new(part_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|p| p.repair_id == repair_id)
            .ok_or(E::RepairPartNotExists(part_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Lock(By::<SparePart, _>::new(part.spare_part_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Inactive ones still take their units back.
        let mut spare_part = tx
            .execute(Select(By::<Option<SparePart>, _>::new(
                part.spare_part_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SparePartNotExists(part.spare_part_id))
            .map_err(tracerr::wrap!())?;

        let before = spare_part.stock_quantity;
        spare_part
            .release(part.quantity)
            .map_err(E::StockOverflow)
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<repair::Part, _>::new(part.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Update(spare_part.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(StockMovement::new(
            spare_part.id,
            stock_movement::Kind::In,
            (stock_movement::ReferenceKind::Repair, Some(repair.id.into())),
            before,
            spare_part.stock_quantity,
            None,
        )))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
        .map(drop)?;

        let parts = tx
            .execute(Select(By::<Vec<repair::Part>, _>::new(repair.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        repair.recompute_costs(&parts);

        tx.execute(Update(repair.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "`Repair(number: {})` returned {} of `SparePart(code: {})`",
            repair.number,
            part.quantity,
            spare_part.code,
        );

        Ok(repair)
    }
}

/// Error of [`RemoveRepairPart`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Repair`] with the provided ID does not exist.
    #[display("`Repair(id: {_0})` does not exist")]
    RepairNotExists(#[error(not(source))] repair::Id),

    /// [`repair::Part`] with the provided ID does not exist in the
    /// [`Repair`].
    #[display("`RepairPart(id: {_0})` does not exist")]
    RepairPartNotExists(#[error(not(source))] repair::part::Id),

    /// [`SparePart`] of the [`repair::Part`] does not exist.
    #[display("`SparePart(id: {_0})` does not exist")]
    SparePartNotExists(#[error(not(source))] spare_part::Id),

    /// [`SparePart`] stock cannot take the units back.
    #[display("Stock overflow: {_0}")]
    StockOverflow(spare_part::StockOverflow),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        Money,
    };

    use super::{ExecutionError, RemoveRepairPart};
    use crate::{
        command::AddRepairPart,
        domain::{fixture, repair, spare_part, Repair, SparePart},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    #[tokio::test]
    async fn add_then_remove_restores_stock_and_costs() {
        let svc = Service::with_database(Memory::new());
        let mut repair = fixture::repair(repair::Status::InProgress);
        repair.labor_cost = Money::from(250);
        repair.total_cost = Money::from(250);
        let part = fixture::spare_part(7, Money::from(40));
        svc.database().execute(Insert(repair.clone())).await.unwrap();
        svc.database().execute(Insert(part.clone())).await.unwrap();

        let added = svc
            .execute(AddRepairPart {
                repair_id: repair.id,
                spare_part_id: part.id,
                quantity: spare_part::Quantity::new(3).unwrap(),
                notes: None,
            })
            .await
            .unwrap();
        assert_eq!(added.repair.total_cost, Money::from(370));

        let restored = svc
            .execute(RemoveRepairPart {
                repair_id: repair.id,
                part_id: added.part.id,
            })
            .await
            .unwrap();

        assert_eq!(restored.total_parts_cost, Money::ZERO);
        assert_eq!(restored.total_cost, Money::from(250));
        let stock = svc
            .database()
            .execute(Select(By::<Option<SparePart>, _>::new(part.id)))
            .await
            .unwrap()
            .unwrap()
            .stock_quantity;
        assert_eq!(stock, 7);
        let lines = svc
            .database()
            .execute(Select(By::<Vec<repair::Part>, _>::new(repair.id)))
            .await
            .unwrap();
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn keeps_line_when_stock_cannot_take_units_back() {
        let svc = Service::with_database(Memory::new());
        let repair = fixture::repair(repair::Status::InProgress);
        let part = fixture::spare_part(u32::MAX, Money::from(40));
        let line = repair::Part::new(
            repair.id,
            part.id,
            spare_part::Quantity::new(1).unwrap(),
            Money::from(40),
            None,
        );
        svc.database().execute(Insert(repair.clone())).await.unwrap();
        svc.database().execute(Insert(part.clone())).await.unwrap();
        svc.database().execute(Insert(line.clone())).await.unwrap();

        let err = svc
            .execute(RemoveRepairPart {
                repair_id: repair.id,
                part_id: line.id,
            })
            .await
            .unwrap_err();

        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::StockOverflow(e)
                    if e.available == u32::MAX && e.released == 1,
            ),
            "unexpected error: {err}",
        );
        let lines = svc
            .database()
            .execute(Select(By::<Vec<repair::Part>, _>::new(repair.id)))
            .await
            .unwrap();
        assert_eq!(lines.len(), 1);
        let stock = svc
            .database()
            .execute(Select(By::<Option<SparePart>, _>::new(part.id)))
            .await
            .unwrap()
            .unwrap()
            .stock_quantity;
        assert_eq!(stock, u32::MAX);
    }

    #[tokio::test]
    async fn rejects_line_of_another_repair() {
        let svc = Service::with_database(Memory::new());
        let repair = fixture::repair(repair::Status::InProgress);
        let other = fixture::repair(repair::Status::InProgress);
        let part = fixture::spare_part(1, Money::from(40));
        let line = repair::Part::new(
            other.id,
            part.id,
            spare_part::Quantity::new(1).unwrap(),
            Money::from(40),
            None,
        );
        svc.database().execute(Insert(repair.clone())).await.unwrap();
        svc.database().execute(Insert(other.clone())).await.unwrap();
        svc.database().execute(Insert(part.clone())).await.unwrap();
        svc.database().execute(Insert(line.clone())).await.unwrap();

        let err = svc
            .execute(RemoveRepairPart {
                repair_id: repair.id,
                part_id: line.id,
            })
            .await
            .unwrap_err();

        assert!(
            matches!(err.as_ref(), ExecutionError::RepairPartNotExists(_)),
            "unexpected error: {err}",
        );
        let stored = svc
            .database()
            .execute(Select(By::<Option<Repair>, _>::new(other.id)))
            .await
            .unwrap();
        assert!(stored.is_some());
    }
}
