//! [`Command`] for consuming a [`SparePart`] in a [`Repair`].

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
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

/// [`Command`] for consuming a [`SparePart`] in a [`Repair`].
///
/// Takes the units out of the stock, records a [`repair::Part`] line with the
/// current [`SparePart::cost_price`] as its unit cost and recomputes the
/// [`Repair`] costs out of all its lines.
#[derive(Clone, Debug)]
pub struct AddRepairPart {
    /// ID of the [`Repair`] consuming the [`SparePart`].
    pub repair_id: repair::Id,

    /// ID of the consumed [`SparePart`].
    pub spare_part_id: spare_part::Id,

    /// Consumed [`spare_part::Quantity`].
    pub quantity: spare_part::Quantity,

    /// Notes about the consumption.
    pub notes: Option<repair::part::Notes>,
}

/// Output of [`AddRepairPart`] [`Command`] execution.
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Repair`] with recomputed costs.
    pub repair: Repair,

    /// Recorded [`repair::Part`] line.
    pub part: repair::Part,
}

impl<Db> Command<AddRepairPart> for Service<Db>
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
            Select<By<Vec<repair::Part>, repair::Id>>,
            Ok = Vec<repair::Part>,
            Err = Traced<database::Error>,
        > + Database<Insert<repair::Part>, Err = Traced<database::Error>>
        + Database<Update<Repair>, Err = Traced<database::Error>>
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
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AddRepairPart) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddRepairPart {
            repair_id,
            spare_part_id,
            quantity,
            notes,
        } = cmd;

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

        tx.execute(Lock(By::<SparePart, _>::new(spare_part_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut spare_part = tx
            .execute(Select(By::<Option<SparePart>, _>::new(spare_part_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|p| p.is_active)
            .ok_or(E::SparePartNotExists(spare_part_id))
            .map_err(tracerr::wrap!())?;

        let before = spare_part.stock_quantity;
        let unit_cost = spare_part
            .reserve(quantity)
            .map_err(E::InsufficientStock)
            .map_err(tracerr::wrap!())?;

        let part =
            repair::Part::new(repair.id, spare_part.id, quantity, unit_cost, notes);
        tx.execute(Insert(part.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Update(spare_part.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(StockMovement::new(
            spare_part.id,
            stock_movement::Kind::Out,
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
            "`Repair(number: {})` consumed {quantity} of \
             `SparePart(code: {})`, {} left",
            repair.number,
            spare_part.code,
            spare_part.stock_quantity,
        );
        if spare_part.is_low_on_stock() {
            log::warn!(
                "`SparePart(code: {})` is low on stock: {} left",
                spare_part.code,
                spare_part.stock_quantity,
            );
        }

        Ok(Output { repair, part })
    }
}

/// Error of [`AddRepairPart`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`SparePart`] doesn't have enough units in stock.
    #[display("Insufficient stock: {_0}")]
    InsufficientStock(spare_part::InsufficientStock),

    /// [`Repair`] with the provided ID does not exist.
    #[display("`Repair(id: {_0})` does not exist")]
    RepairNotExists(#[error(not(source))] repair::Id),

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

    use super::{AddRepairPart, ExecutionError};
    use crate::{
        domain::{
            fixture, repair, spare_part, stock_movement, Repair, SparePart,
            StockMovement,
        },
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    fn command(
        repair: &Repair,
        part: &SparePart,
        quantity: u32,
    ) -> AddRepairPart {
        AddRepairPart {
            repair_id: repair.id,
            spare_part_id: part.id,
            quantity: spare_part::Quantity::new(quantity).unwrap(),
            notes: None,
        }
    }

    async fn stored_stock(svc: &Service<Memory>, id: spare_part::Id) -> u32 {
        svc.database()
            .execute(Select(By::<Option<SparePart>, _>::new(id)))
            .await
            .unwrap()
            .unwrap()
            .stock_quantity
    }

    #[tokio::test]
    async fn reserves_stock_until_insufficient() {
        let svc = Service::with_database(Memory::new());
        let repair = fixture::repair(repair::Status::InProgress);
        let part = fixture::spare_part(5, Money::from(5000));
        svc.database().execute(Insert(repair.clone())).await.unwrap();
        svc.database().execute(Insert(part.clone())).await.unwrap();

        _ = svc.execute(command(&repair, &part, 3)).await.unwrap();
        assert_eq!(stored_stock(&svc, part.id).await, 2);

        let err = svc.execute(command(&repair, &part, 3)).await.unwrap_err();
        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::InsufficientStock(e)
                    if e.available == 2 && e.requested == 3,
            ),
            "unexpected error: {err}",
        );
        assert_eq!(stored_stock(&svc, part.id).await, 2);

        let lines = svc
            .database()
            .execute(Select(By::<Vec<repair::Part>, _>::new(repair.id)))
            .await
            .unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[tokio::test]
    async fn snapshots_unit_cost_and_recomputes_totals() {
        let svc = Service::with_database(Memory::new());
        let mut repair = fixture::repair(repair::Status::InProgress);
        repair.labor_cost = Money::from(100_000);
        repair.total_cost = Money::from(100_000);
        let part = fixture::spare_part(10, Money::from(5000));
        svc.database().execute(Insert(repair.clone())).await.unwrap();
        svc.database().execute(Insert(part.clone())).await.unwrap();

        let out = svc.execute(command(&repair, &part, 2)).await.unwrap();

        assert_eq!(out.part.unit_cost, Money::from(5000));
        assert_eq!(out.part.total_cost, Money::from(10_000));
        assert_eq!(out.repair.total_parts_cost, Money::from(10_000));
        assert_eq!(out.repair.total_cost, Money::from(110_000));

        let stored = svc
            .database()
            .execute(Select(By::<Option<Repair>, _>::new(repair.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_cost, Money::from(110_000));
    }

    #[tokio::test]
    async fn journals_outgoing_movement() {
        let svc = Service::with_database(Memory::new());
        let repair = fixture::repair(repair::Status::Pending);
        let part = fixture::spare_part(4, Money::from(100));
        svc.database().execute(Insert(repair.clone())).await.unwrap();
        svc.database().execute(Insert(part.clone())).await.unwrap();

        _ = svc.execute(command(&repair, &part, 3)).await.unwrap();

        let movements = svc
            .database()
            .execute(Select(By::<Vec<StockMovement>, _>::new(part.id)))
            .await
            .unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, stock_movement::Kind::Out);
        assert_eq!(movements[0].quantity_before, 4);
        assert_eq!(movements[0].quantity_moved, 3);
        assert_eq!(movements[0].quantity_after, 1);
    }

    #[tokio::test]
    async fn rejects_inactive_spare_part() {
        let svc = Service::with_database(Memory::new());
        let repair = fixture::repair(repair::Status::Pending);
        let mut part = fixture::spare_part(4, Money::from(100));
        part.is_active = false;
        svc.database().execute(Insert(repair.clone())).await.unwrap();
        svc.database().execute(Insert(part.clone())).await.unwrap();

        let err = svc.execute(command(&repair, &part, 1)).await.unwrap_err();

        assert!(
            matches!(err.as_ref(), ExecutionError::SparePartNotExists(_)),
            "unexpected error: {err}",
        );
        assert_eq!(stored_stock(&svc, part.id).await, 4);
    }
}
