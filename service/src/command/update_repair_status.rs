//! [`Command`] for moving a [`Repair`] through its lifecycle.

use common::operations::{By, Commit, Lock, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{repair, vehicle, Repair, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for moving a [`Repair`] into a new [`repair::Status`].
///
/// Completing a [`Repair`] adds its total cost to the repair cost of its
/// [`Vehicle`] and makes the [`Vehicle`] [`vehicle::Status::ReadyToSell`],
/// even if it's [`vehicle::Status::Sold`] already.
#[derive(Clone, Copy, Debug)]
pub struct UpdateRepairStatus {
    /// ID of the [`Repair`] to be updated.
    pub repair_id: repair::Id,

    /// New [`repair::Status`] of the [`Repair`].
    pub status: repair::Status,
}

impl<Db> Command<UpdateRepairStatus> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Repair, repair::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Repair>, repair::Id>>,
            Ok = Option<Repair>,
            Err = Traced<database::Error>,
        > + Database<Update<Repair>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Vehicle, vehicle::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<Update<Vehicle>, Err = Traced<database::Error>>,
{
    type Ok = Repair;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateRepairStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRepairStatus { repair_id, status } = cmd;

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

        repair
            .transition(status)
            .map_err(E::InvalidStatusTransition)
            .map_err(tracerr::wrap!())?;

        match status {
            repair::Status::Completed => {
                let vehicle_id = repair.vehicle_id;

                // Always locked after the `Repair` to keep the lock order.
                tx.execute(Lock(By::<Vehicle, _>::new(vehicle_id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;

                let mut vehicle = tx
                    .execute(Select(By::<Option<Vehicle>, _>::new(vehicle_id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::VehicleNotExists(vehicle_id))
                    .map_err(tracerr::wrap!())?;

                vehicle.accumulate_repair_cost(repair.total_cost);
                vehicle.set_status(vehicle::Status::ReadyToSell);

                tx.execute(Update(vehicle))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
            repair::Status::Cancelled => {
                // NOTE: Neither the consumed spare parts are returned to the
                //       stock, nor anything is subtracted from the repair
                //       cost of the `Vehicle` here. This mirrors how the
                //       workshop has always treated cancellations, but most
                //       likely has to be revisited.
                //       The same drift happens when the labor cost of an
                //       already completed `Repair` is changed afterwards.
                log::warn!(
                    "`Repair(number: {})` cancelled without returning its \
                     consumed parts",
                    repair.number,
                );
            }
            repair::Status::Pending | repair::Status::InProgress => {}
        }

        tx.execute(Update(repair.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!("`Repair(number: {})` is {status} now", repair.number);

        Ok(repair)
    }
}

/// Error of [`UpdateRepairStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested [`repair::Status`] cannot follow the current one.
    #[display("Invalid `Repair` status transition: {_0}")]
    InvalidStatusTransition(repair::InvalidStatusTransition),

    /// [`Repair`] with the provided ID does not exist.
    #[display("`Repair(id: {_0})` does not exist")]
    RepairNotExists(#[error(not(source))] repair::Id),

    /// [`Vehicle`] of the [`Repair`] does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        Money,
    };

    use super::{ExecutionError, UpdateRepairStatus};
    use crate::{
        domain::{fixture, repair, vehicle, Repair, Vehicle},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    /// Stores a [`Vehicle`] in the provided status along with its [`Repair`]
    /// in the provided status costing `total`.
    async fn seed(
        svc: &Service<Memory>,
        vehicle_status: vehicle::Status,
        repair_status: repair::Status,
        total: u32,
    ) -> (Vehicle, Repair) {
        let mut vehicle = fixture::vehicle(vehicle_status);
        vehicle.total_repair_cost = Money::from(1000);
        let mut repair = fixture::repair(repair_status);
        repair.vehicle_id = vehicle.id;
        repair.labor_cost = Money::from(total);
        repair.total_cost = Money::from(total);
        svc.database().execute(Insert(vehicle.clone())).await.unwrap();
        svc.database().execute(Insert(repair.clone())).await.unwrap();
        (vehicle, repair)
    }

    async fn stored_vehicle(svc: &Service<Memory>, id: vehicle::Id) -> Vehicle {
        svc.database()
            .execute(Select(By::<Option<Vehicle>, _>::new(id)))
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn starts_pending_repair() {
        let svc = Service::with_database(Memory::new());
        let (vehicle, repair) = seed(
            &svc,
            vehicle::Status::InRepair,
            repair::Status::Pending,
            500,
        )
        .await;

        let started = svc
            .execute(UpdateRepairStatus {
                repair_id: repair.id,
                status: repair::Status::InProgress,
            })
            .await
            .unwrap();

        assert_eq!(started.status, repair::Status::InProgress);
        assert!(started.started_at.is_some());
        let vehicle = stored_vehicle(&svc, vehicle.id).await;
        assert_eq!(vehicle.status, vehicle::Status::InRepair);
        assert_eq!(vehicle.total_repair_cost, Money::from(1000));
    }

    #[tokio::test]
    async fn completion_makes_sold_vehicle_ready_to_sell() {
        let svc = Service::with_database(Memory::new());
        let (vehicle, repair) = seed(
            &svc,
            vehicle::Status::Sold,
            repair::Status::InProgress,
            110_000,
        )
        .await;

        let completed = svc
            .execute(UpdateRepairStatus {
                repair_id: repair.id,
                status: repair::Status::Completed,
            })
            .await
            .unwrap();

        assert!(completed.completed_at.is_some());
        let vehicle = stored_vehicle(&svc, vehicle.id).await;
        assert_eq!(vehicle.status, vehicle::Status::ReadyToSell);
        assert_eq!(vehicle.total_repair_cost, Money::from(111_000));
    }

    #[tokio::test]
    async fn cancellation_keeps_vehicle_untouched() {
        let svc = Service::with_database(Memory::new());
        let (vehicle, repair) = seed(
            &svc,
            vehicle::Status::InRepair,
            repair::Status::InProgress,
            700,
        )
        .await;

        _ = svc
            .execute(UpdateRepairStatus {
                repair_id: repair.id,
                status: repair::Status::Cancelled,
            })
            .await
            .unwrap();

        let vehicle = stored_vehicle(&svc, vehicle.id).await;
        assert_eq!(vehicle.status, vehicle::Status::InRepair);
        assert_eq!(vehicle.total_repair_cost, Money::from(1000));
    }

    #[tokio::test]
    async fn rejects_completing_twice() {
        let svc = Service::with_database(Memory::new());
        let (vehicle, repair) = seed(
            &svc,
            vehicle::Status::ReadyToSell,
            repair::Status::Completed,
            700,
        )
        .await;

        let err = svc
            .execute(UpdateRepairStatus {
                repair_id: repair.id,
                status: repair::Status::Completed,
            })
            .await
            .unwrap_err();

        assert!(
            matches!(err.as_ref(), ExecutionError::InvalidStatusTransition(_)),
            "unexpected error: {err}",
        );
        let vehicle = stored_vehicle(&svc, vehicle.id).await;
        assert_eq!(vehicle.total_repair_cost, Money::from(1000));
    }
}
