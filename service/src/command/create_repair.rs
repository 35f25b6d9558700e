//! [`Command`] for opening a new [`Repair`] of a [`Vehicle`].

use common::{
    operations::{
        By, Commit, Increment, Insert, Lock, Select, Transact, Transacted,
        Update,
    },
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{repair, sequence, user, vehicle, Repair, Vehicle},
    infra::{database, Database},
    Service,
};

use super::{next_code, Command};

/// [`Command`] for opening a new [`Repair`] of a [`Vehicle`].
///
/// The [`Vehicle`] is moved into [`vehicle::Status::InRepair`] whatever its
/// current [`vehicle::Status`] is.
#[derive(Clone, Debug)]
pub struct CreateRepair {
    /// ID of the [`Vehicle`] to be repaired.
    pub vehicle_id: vehicle::Id,

    /// Title of the new [`Repair`].
    pub title: repair::Title,

    /// Description of the new [`Repair`].
    pub description: Option<repair::Description>,

    /// ID of the mechanic assigned to the new [`Repair`].
    pub mechanic_id: Option<user::Id>,
}

impl<Db> Command<CreateRepair> for Service<Db>
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
            Increment<By<sequence::Value, sequence::Key>>,
            Ok = sequence::Value,
            Err = Traced<database::Error>,
        > + Database<Insert<Repair>, Err = Traced<database::Error>>
        + Database<Update<Vehicle>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Repair;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRepair) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRepair {
            vehicle_id,
            title,
            description,
            mechanic_id,
        } = cmd;

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

        let now = DateTime::now();
        let number = next_code(
            &tx,
            sequence::Key::daily(sequence::Prefix::Repair, &now),
        )
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let repair = Repair {
            id: repair::Id::new(),
            number,
            vehicle_id,
            title,
            description,
            labor_cost: Money::ZERO,
            total_parts_cost: Money::ZERO,
            total_cost: Money::ZERO,
            status: repair::Status::Pending,
            mechanic_id,
            work_notes: None,
            started_at: None,
            completed_at: None,
            created_at: now.coerce(),
        };
        tx.execute(Insert(repair.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        vehicle.set_status(vehicle::Status::InRepair);
        tx.execute(Update(vehicle))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Repair(number: {})` opened for `Vehicle(id: {vehicle_id})`",
            repair.number,
        );

        Ok(repair)
    }
}

/// Error of [`CreateRepair`] [`Command`] execution.
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
    use common::{
        operations::{By, Insert, Select},
        DateTime, Money,
    };

    use super::{CreateRepair, ExecutionError};
    use crate::{
        domain::{fixture, repair, vehicle, Vehicle},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    fn command(vehicle_id: vehicle::Id) -> CreateRepair {
        CreateRepair {
            vehicle_id,
            title: repair::Title::new("Brake service").unwrap(),
            description: None,
            mechanic_id: None,
        }
    }

    #[tokio::test]
    async fn opens_pending_repair_and_moves_vehicle_into_repair() {
        let svc = Service::with_database(Memory::new());
        let vehicle = fixture::vehicle(vehicle::Status::ReadyToSell);
        svc.database().execute(Insert(vehicle.clone())).await.unwrap();

        let first = svc.execute(command(vehicle.id)).await.unwrap();
        let second = svc.execute(command(vehicle.id)).await.unwrap();

        let today = DateTime::now().date_stamp();
        assert_eq!(first.number.as_ref(), format!("REP-{today}-001"));
        assert_eq!(second.number.as_ref(), format!("REP-{today}-002"));
        assert_eq!(first.status, repair::Status::Pending);
        assert_eq!(first.total_cost, Money::ZERO);

        let stored = svc
            .database()
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, vehicle::Status::InRepair);
    }

    #[tokio::test]
    async fn fails_on_unknown_vehicle() {
        let svc = Service::with_database(Memory::new());

        let err = svc.execute(command(vehicle::Id::new())).await.unwrap_err();

        assert!(
            matches!(err.as_ref(), ExecutionError::VehicleNotExists(_)),
            "unexpected error: {err}",
        );
    }
}
