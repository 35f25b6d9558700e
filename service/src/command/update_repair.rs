//! [`Command`] for updating a [`Repair`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{repair, user, Repair},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for overwriting the mutable data of a [`Repair`].
#[derive(Clone, Debug)]
pub struct UpdateRepair {
    /// ID of the [`Repair`] to be updated.
    pub repair_id: repair::Id,

    /// New title of the [`Repair`].
    pub title: repair::Title,

    /// New description of the [`Repair`].
    pub description: Option<repair::Description>,

    /// New labor cost of the [`Repair`], if it should be changed.
    pub labor_cost: Option<Money>,

    /// ID of the newly assigned mechanic, if it should be changed.
    pub mechanic_id: Option<user::Id>,

    /// New notes of the mechanic.
    pub work_notes: Option<repair::WorkNotes>,
}

impl<Db> Command<UpdateRepair> for Service<Db>
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
        > + Database<Update<Repair>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Repair;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateRepair) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRepair {
            repair_id,
            title,
            description,
            labor_cost,
            mechanic_id,
            work_notes,
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

        repair.title = title;
        repair.description = description;
        repair.work_notes = work_notes;
        if let Some(id) = mechanic_id {
            repair.mechanic_id = Some(id);
        }
        // NOTE: Once a `Repair` is completed, its cost is already added to
        //       the repair cost of the `Vehicle`, and changing the labor
        //       cost afterwards doesn't propagate the difference there, so
        //       both drift apart.
        if let Some(cost) = labor_cost {
            repair.labor_cost = cost;
        }

        let parts = tx
            .execute(Select(By::<Vec<repair::Part>, _>::new(repair_id)))
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

        Ok(repair)
    }
}

/// Error of [`UpdateRepair`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Repair`] with the provided ID does not exist.
    #[display("`Repair(id: {_0})` does not exist")]
    RepairNotExists(#[error(not(source))] repair::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        Money,
    };

    use super::{ExecutionError, UpdateRepair};
    use crate::{
        domain::{fixture, repair, spare_part, vehicle, Vehicle},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    #[tokio::test]
    async fn recomputes_total_with_new_labor_cost() {
        let svc = Service::with_database(Memory::new());
        let repair = fixture::repair(repair::Status::InProgress);
        let line = repair::Part::new(
            repair.id,
            spare_part::Id::new(),
            spare_part::Quantity::new(2).unwrap(),
            Money::from(5000),
            None,
        );
        svc.database().execute(Insert(repair.clone())).await.unwrap();
        svc.database().execute(Insert(line)).await.unwrap();

        let updated = svc
            .execute(UpdateRepair {
                repair_id: repair.id,
                title: repair.title.clone(),
                description: None,
                labor_cost: Some(Money::from(100_000)),
                mechanic_id: None,
                work_notes: repair::WorkNotes::new("Pads replaced"),
            })
            .await
            .unwrap();

        assert_eq!(updated.labor_cost, Money::from(100_000));
        assert_eq!(updated.total_parts_cost, Money::from(10_000));
        assert_eq!(updated.total_cost, Money::from(110_000));
    }

    #[tokio::test]
    async fn keeps_labor_cost_when_omitted() {
        let svc = Service::with_database(Memory::new());
        let mut repair = fixture::repair(repair::Status::Pending);
        repair.labor_cost = Money::from(300);
        repair.total_cost = Money::from(300);
        svc.database().execute(Insert(repair.clone())).await.unwrap();

        let updated = svc
            .execute(UpdateRepair {
                repair_id: repair.id,
                title: repair::Title::new("Clutch").unwrap(),
                description: None,
                labor_cost: None,
                mechanic_id: None,
                work_notes: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.title.as_ref(), "Clutch");
        assert_eq!(updated.total_cost, Money::from(300));
    }

    #[tokio::test]
    async fn leaves_vehicle_repair_cost_of_completed_repair() {
        let svc = Service::with_database(Memory::new());
        let mut vehicle = fixture::vehicle(vehicle::Status::ReadyToSell);
        vehicle.total_repair_cost = Money::from(300);
        let mut repair = fixture::repair(repair::Status::Completed);
        repair.vehicle_id = vehicle.id;
        repair.labor_cost = Money::from(300);
        repair.total_cost = Money::from(300);
        svc.database().execute(Insert(vehicle.clone())).await.unwrap();
        svc.database().execute(Insert(repair.clone())).await.unwrap();

        let updated = svc
            .execute(UpdateRepair {
                repair_id: repair.id,
                title: repair.title.clone(),
                description: None,
                labor_cost: Some(Money::from(500)),
                mechanic_id: None,
                work_notes: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.total_cost, Money::from(500));
        let stored = svc
            .database()
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_repair_cost, Money::from(300));
    }

    #[tokio::test]
    async fn fails_on_unknown_repair() {
        let svc = Service::with_database(Memory::new());

        let err = svc
            .execute(UpdateRepair {
                repair_id: repair::Id::new(),
                title: repair::Title::new("Clutch").unwrap(),
                description: None,
                labor_cost: None,
                mechanic_id: None,
                work_notes: None,
            })
            .await
            .unwrap_err();

        assert!(
            matches!(err.as_ref(), ExecutionError::RepairNotExists(_)),
            "unexpected error: {err}",
        );
    }
}
