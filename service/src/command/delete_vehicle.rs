//! [`Command`] for deleting a [`Vehicle`].

use common::operations::{By, Commit, Delete, Lock, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{vehicle, Vehicle},
    infra::{database, Database},
    read::vehicle::HasHistory,
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Vehicle`] permanently.
///
/// Only a [`Vehicle`] without any repairs or transactions may be deleted.
#[derive(Clone, Copy, Debug)]
pub struct DeleteVehicle {
    /// ID of the [`Vehicle`] to be deleted.
    pub vehicle_id: vehicle::Id,
}

impl<Db> Command<DeleteVehicle> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Vehicle, vehicle::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HasHistory, vehicle::Id>>,
            Ok = HasHistory,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Vehicle, vehicle::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vehicle;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteVehicle) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteVehicle { vehicle_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Vehicle, _>::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let vehicle = tx
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(vehicle_id))
            .map_err(tracerr::wrap!())?;

        let HasHistory(has_history) = tx
            .execute(Select(By::<HasHistory, _>::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if has_history {
            return Err(tracerr::new!(E::VehicleHasHistory(vehicle_id)));
        }

        tx.execute(Delete(By::<Vehicle, _>::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!("`Vehicle(id: {vehicle_id}, code: {})` deleted", vehicle.code);

        Ok(vehicle)
    }
}

/// Error of [`DeleteVehicle`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vehicle`] is referenced by repairs or transactions.
    #[display("`Vehicle(id: {_0})` has repairs or transactions")]
    VehicleHasHistory(#[error(not(source))] vehicle::Id),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use super::{DeleteVehicle, ExecutionError};
    use crate::{
        domain::{fixture, repair, vehicle::Status, Vehicle},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    #[tokio::test]
    async fn deletes_vehicle_without_history() {
        let svc = Service::with_database(Memory::new());
        let vehicle = fixture::vehicle(Status::Purchased);
        svc.database().execute(Insert(vehicle.clone())).await.unwrap();

        _ = svc
            .execute(DeleteVehicle {
                vehicle_id: vehicle.id,
            })
            .await
            .unwrap();

        let stored = svc
            .database()
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle.id)))
            .await
            .unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn keeps_vehicle_with_repairs() {
        let svc = Service::with_database(Memory::new());
        let vehicle = fixture::vehicle(Status::InRepair);
        let mut repair = fixture::repair(repair::Status::Pending);
        repair.vehicle_id = vehicle.id;
        svc.database().execute(Insert(vehicle.clone())).await.unwrap();
        svc.database().execute(Insert(repair)).await.unwrap();

        let err = svc
            .execute(DeleteVehicle {
                vehicle_id: vehicle.id,
            })
            .await
            .unwrap_err();

        assert!(
            matches!(err.as_ref(), ExecutionError::VehicleHasHistory(_)),
            "unexpected error: {err}",
        );
        let stored = svc
            .database()
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle.id)))
            .await
            .unwrap();
        assert!(stored.is_some());
    }
}
