//! [`Command`] for overwriting the [`vehicle::Status`] of a [`Vehicle`].

use common::operations::{By, Commit, Lock, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{vehicle, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for overwriting the [`vehicle::Status`] of a [`Vehicle`].
///
/// The requested [`vehicle::Status`] is not checked to be reachable from the
/// current one.
#[derive(Clone, Copy, Debug)]
pub struct UpdateVehicleStatus {
    /// ID of the [`Vehicle`] to be updated.
    pub vehicle_id: vehicle::Id,

    /// New [`vehicle::Status`] of the [`Vehicle`].
    pub status: vehicle::Status,
}

impl<Db> Command<UpdateVehicleStatus> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Vehicle, vehicle::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<Update<Vehicle>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vehicle;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateVehicleStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateVehicleStatus { vehicle_id, status } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

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

        let previous = vehicle.status;
        vehicle.set_status(status);

        tx.execute(Update(vehicle.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "`Vehicle(id: {vehicle_id})` status overwritten: \
             {previous} -> {status}",
        );

        Ok(vehicle)
    }
}

/// Error of [`UpdateVehicleStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;

    use super::{ExecutionError, UpdateVehicleStatus};
    use crate::{
        domain::{fixture, vehicle::Status},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    #[tokio::test]
    async fn overwrites_status_unconditionally() {
        let svc = Service::with_database(Memory::new());
        let vehicle = fixture::vehicle(Status::Sold);
        svc.database().execute(Insert(vehicle.clone())).await.unwrap();

        let updated = svc
            .execute(UpdateVehicleStatus {
                vehicle_id: vehicle.id,
                status: Status::Purchased,
            })
            .await
            .unwrap();

        assert_eq!(updated.status, Status::Purchased);
    }

    #[tokio::test]
    async fn fails_on_unknown_vehicle() {
        let svc = Service::with_database(Memory::new());

        let err = svc
            .execute(UpdateVehicleStatus {
                vehicle_id: crate::domain::vehicle::Id::new(),
                status: Status::Reserved,
            })
            .await
            .unwrap_err();

        assert!(
            matches!(err.as_ref(), ExecutionError::VehicleNotExists(_)),
            "unexpected error: {err}",
        );
    }
}
