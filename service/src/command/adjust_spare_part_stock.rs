//! [`Command`] for adjusting the stock of a [`SparePart`].

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{spare_part, stock_movement, SparePart, StockMovement},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for setting the stock of a [`SparePart`] to an absolute value
/// after a stocktaking or a delivery.
#[derive(Clone, Debug)]
pub struct AdjustSparePartStock {
    /// ID of the [`SparePart`] to adjust the stock of.
    pub spare_part_id: spare_part::Id,

    /// New stock of the [`SparePart`].
    pub quantity: u32,

    /// Reason of the adjustment.
    pub notes: Option<stock_movement::Notes>,
}

impl<Db> Command<AdjustSparePartStock> for Service<Db>
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
        + Database<Insert<StockMovement>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = SparePart;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AdjustSparePartStock,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AdjustSparePartStock {
            spare_part_id,
            quantity,
            notes,
        } = cmd;

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

        let before = part.stock_quantity;
        if before == quantity {
            return Ok(part);
        }

        part.stock_quantity = quantity;
        part.touch();
        tx.execute(Update(part.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(StockMovement::new(
            part.id,
            stock_movement::Kind::Adjustment,
            (stock_movement::ReferenceKind::Adjustment, None),
            before,
            quantity,
            notes,
        )))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
        .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`SparePart(code: {})` stock adjusted: {before} -> {quantity}",
            part.code,
        );

        Ok(part)
    }
}

/// Error of [`AdjustSparePartStock`] [`Command`] execution.
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

    use super::AdjustSparePartStock;
    use crate::{
        domain::{fixture, stock_movement, StockMovement},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    #[tokio::test]
    async fn sets_stock_and_journals_difference() {
        let svc = Service::with_database(Memory::new());
        let part = fixture::spare_part(10, Money::from(100));
        svc.database().execute(Insert(part.clone())).await.unwrap();

        let adjusted = svc
            .execute(AdjustSparePartStock {
                spare_part_id: part.id,
                quantity: 4,
                notes: stock_movement::Notes::new("Stocktaking"),
            })
            .await
            .unwrap();

        assert_eq!(adjusted.stock_quantity, 4);
        let movements = svc
            .database()
            .execute(Select(By::<Vec<StockMovement>, _>::new(part.id)))
            .await
            .unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].quantity_before, 10);
        assert_eq!(movements[0].quantity_moved, 6);
        assert_eq!(movements[0].quantity_after, 4);
    }

    #[tokio::test]
    async fn skips_unchanged_stock() {
        let svc = Service::with_database(Memory::new());
        let part = fixture::spare_part(3, Money::from(100));
        svc.database().execute(Insert(part.clone())).await.unwrap();

        _ = svc
            .execute(AdjustSparePartStock {
                spare_part_id: part.id,
                quantity: 3,
                notes: None,
            })
            .await
            .unwrap();

        let movements = svc
            .database()
            .execute(Select(By::<Vec<StockMovement>, _>::new(part.id)))
            .await
            .unwrap();
        assert!(movements.is_empty());
    }
}
