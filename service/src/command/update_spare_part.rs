//! [`Command`] for updating a [`SparePart`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{spare_part, SparePart},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for overwriting catalogue data of a [`SparePart`].
///
/// Stock is changed by [`AdjustSparePartStock`] only.
///
/// [`AdjustSparePartStock`]: super::AdjustSparePartStock
#[derive(Clone, Debug)]
pub struct UpdateSparePart {
    /// ID of the [`SparePart`] to be updated.
    pub spare_part_id: spare_part::Id,

    /// New name of the [`SparePart`].
    pub name: spare_part::Name,

    /// New description of the [`SparePart`].
    pub description: Option<spare_part::Description>,

    /// New brand of the [`SparePart`].
    pub brand: Option<spare_part::Brand>,

    /// New cost price of the [`SparePart`].
    pub cost_price: Money,

    /// New selling price of the [`SparePart`].
    pub selling_price: Money,

    /// New minimum stock level of the [`SparePart`].
    pub min_stock_level: u32,

    /// New unit the stock of the [`SparePart`] is measured in.
    pub unit_measure: Option<spare_part::UnitMeasure>,

    /// Whether the [`SparePart`] should be (de)activated.
    pub is_active: Option<bool>,
}

impl<Db> Command<UpdateSparePart> for Service<Db>
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
        cmd: UpdateSparePart,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateSparePart {
            spare_part_id,
            name,
            description,
            brand,
            cost_price,
            selling_price,
            min_stock_level,
            unit_measure,
            is_active,
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
            .ok_or(E::SparePartNotExists(spare_part_id))
            .map_err(tracerr::wrap!())?;

        part.name = name;
        part.description = description;
        part.brand = brand;
        part.cost_price = cost_price;
        part.selling_price = selling_price;
        part.min_stock_level = min_stock_level;
        part.unit_measure = unit_measure;
        if let Some(active) = is_active {
            part.is_active = active;
        }
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

/// Error of [`UpdateSparePart`] [`Command`] execution.
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
    use common::{operations::Insert, Money};

    use super::{ExecutionError, UpdateSparePart};
    use crate::{
        domain::{fixture, spare_part, SparePart},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    fn command(part: &SparePart, is_active: Option<bool>) -> UpdateSparePart {
        UpdateSparePart {
            spare_part_id: part.id,
            name: spare_part::Name::new("Oil filter XL").unwrap(),
            description: None,
            brand: None,
            cost_price: Money::from(7000),
            selling_price: Money::from(9000),
            min_stock_level: 3,
            unit_measure: None,
            is_active,
        }
    }

    #[tokio::test]
    async fn keeps_stock_untouched() {
        let svc = Service::with_database(Memory::new());
        let part = fixture::spare_part(9, Money::from(5000));
        svc.database().execute(Insert(part.clone())).await.unwrap();

        let updated = svc.execute(command(&part, None)).await.unwrap();

        assert_eq!(updated.cost_price, Money::from(7000));
        assert_eq!(updated.min_stock_level, 3);
        assert_eq!(updated.stock_quantity, 9);
        assert!(updated.is_active);
    }

    #[tokio::test]
    async fn reactivates_part() {
        let svc = Service::with_database(Memory::new());
        let mut part = fixture::spare_part(0, Money::from(5000));
        part.is_active = false;
        svc.database().execute(Insert(part.clone())).await.unwrap();

        let updated = svc.execute(command(&part, Some(true))).await.unwrap();

        assert!(updated.is_active);
    }

    #[tokio::test]
    async fn fails_on_unknown_part() {
        let svc = Service::with_database(Memory::new());
        let part = fixture::spare_part(0, Money::from(5000));

        let err = svc.execute(command(&part, None)).await.unwrap_err();

        assert!(
            matches!(err.as_ref(), ExecutionError::SparePartNotExists(_)),
            "unexpected error: {err}",
        );
    }
}
