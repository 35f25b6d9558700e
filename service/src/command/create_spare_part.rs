//! [`Command`] for adding a new [`SparePart`] to the catalogue.

use common::{
    operations::{By, Commit, Increment, Insert, Transact, Transacted},
    DateTime, Money,
};
use tracerr::Traced;

use crate::{
    domain::{sequence, spare_part, stock_movement, SparePart, StockMovement},
    infra::{database, Database},
    Service,
};

use super::{next_code, Command};

/// [`Command`] for adding a new [`SparePart`] to the catalogue.
///
/// Initial stock, if any, is journaled as a
/// [`stock_movement::Kind::Adjustment`].
#[derive(Clone, Debug)]
pub struct CreateSparePart {
    /// Name of the new [`SparePart`].
    pub name: spare_part::Name,

    /// Description of the new [`SparePart`].
    pub description: Option<spare_part::Description>,

    /// Brand of the new [`SparePart`].
    pub brand: Option<spare_part::Brand>,

    /// Price the new [`SparePart`] is bought for.
    pub cost_price: Money,

    /// Price the new [`SparePart`] is sold for.
    pub selling_price: Money,

    /// Initial stock of the new [`SparePart`].
    pub stock_quantity: u32,

    /// Stock level at or below which the new [`SparePart`] is low on stock.
    pub min_stock_level: u32,

    /// Unit the stock of the new [`SparePart`] is measured in.
    pub unit_measure: Option<spare_part::UnitMeasure>,
}

impl<Db> Command<CreateSparePart> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Increment<By<sequence::Value, sequence::Key>>,
            Ok = sequence::Value,
            Err = Traced<database::Error>,
        > + Database<Insert<SparePart>, Err = Traced<database::Error>>
        + Database<Insert<StockMovement>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = SparePart;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateSparePart,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateSparePart {
            name,
            description,
            brand,
            cost_price,
            selling_price,
            stock_quantity,
            min_stock_level,
            unit_measure,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        let code =
            next_code(&tx, sequence::Key::global(sequence::Prefix::SparePart))
                .await
                .map_err(tracerr::wrap!())?;

        let now = DateTime::now();
        let part = SparePart {
            id: spare_part::Id::new(),
            code,
            name,
            description,
            brand,
            cost_price,
            selling_price,
            stock_quantity,
            min_stock_level,
            unit_measure,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            is_active: true,
        };
        tx.execute(Insert(part.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        if stock_quantity > 0 {
            tx.execute(Insert(StockMovement::new(
                part.id,
                stock_movement::Kind::Adjustment,
                (stock_movement::ReferenceKind::Adjustment, None),
                0,
                stock_quantity,
                stock_movement::Notes::new("Initial stock"),
            )))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(part)
    }
}

/// Error of [`CreateSparePart`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        Money,
    };

    use super::CreateSparePart;
    use crate::{
        domain::{spare_part, stock_movement, StockMovement},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    fn command(stock_quantity: u32) -> CreateSparePart {
        CreateSparePart {
            name: spare_part::Name::new("Brake pad").unwrap(),
            description: None,
            brand: spare_part::Brand::new("Bendix"),
            cost_price: Money::from(150_000),
            selling_price: Money::from(200_000),
            stock_quantity,
            min_stock_level: 2,
            unit_measure: spare_part::UnitMeasure::new("set"),
        }
    }

    #[tokio::test]
    async fn journals_initial_stock() {
        let svc = Service::with_database(Memory::new());

        let part = svc.execute(command(12)).await.unwrap();

        assert_eq!(part.code.as_ref(), "PART-001");
        assert!(part.is_active);
        let movements = svc
            .database()
            .execute(Select(By::<Vec<StockMovement>, _>::new(part.id)))
            .await
            .unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, stock_movement::Kind::Adjustment);
        assert_eq!(movements[0].quantity_after, 12);
    }

    #[tokio::test]
    async fn skips_journal_without_stock() {
        let svc = Service::with_database(Memory::new());

        let part = svc.execute(command(0)).await.unwrap();

        let movements = svc
            .database()
            .execute(Select(By::<Vec<StockMovement>, _>::new(part.id)))
            .await
            .unwrap();
        assert!(movements.is_empty());
    }
}
