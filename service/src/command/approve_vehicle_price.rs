//! [`Command`] for approving a selling price of a [`Vehicle`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{user, vehicle, User, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for approving a selling price of a [`Vehicle`] by an
/// administrator.
#[derive(Clone, Copy, Debug)]
pub struct ApproveVehiclePrice {
    /// ID of the [`Vehicle`] to approve the price of.
    pub vehicle_id: vehicle::Id,

    /// Approved selling price.
    pub price: Money,

    /// ID of the approving [`User`].
    pub admin_id: user::Id,
}

impl<Db> Command<ApproveVehiclePrice> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        >,
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
        cmd: ApproveVehiclePrice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ApproveVehiclePrice {
            vehicle_id,
            price,
            admin_id,
        } = cmd;

        let admin = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(admin_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|u| u.is_active)
            .ok_or(E::UserNotExists(admin_id))
            .map_err(tracerr::wrap!())?;
        if admin.role != user::Role::Admin {
            return Err(tracerr::new!(E::UserNotAdmin(admin_id)));
        }

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

        vehicle.approve_price(price, admin.id);

        tx.execute(Update(vehicle.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Vehicle(id: {vehicle_id})` price {price} approved by \
             `User(id: {admin_id})`",
        );

        Ok(vehicle)
    }
}

/// Error of [`ApproveVehiclePrice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not an administrator.
    #[display("`User(id: {_0})` is not an administrator")]
    UserNotAdmin(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, Money};

    use super::{ApproveVehiclePrice, ExecutionError};
    use crate::{
        domain::{fixture, user::Role, vehicle::Status},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    #[tokio::test]
    async fn records_approval() {
        let svc = Service::with_database(Memory::new());
        let admin = fixture::user(Role::Admin);
        let vehicle = fixture::vehicle(Status::ReadyToSell);
        svc.database().execute(Insert(admin.clone())).await.unwrap();
        svc.database().execute(Insert(vehicle.clone())).await.unwrap();

        let approved = svc
            .execute(ApproveVehiclePrice {
                vehicle_id: vehicle.id,
                price: Money::from(140_000_000),
                admin_id: admin.id,
            })
            .await
            .unwrap();

        assert_eq!(
            approved.approved_selling_price,
            Some(Money::from(140_000_000)),
        );
        assert_eq!(approved.price_approved_by, Some(admin.id));
    }

    #[tokio::test]
    async fn rejects_non_admin() {
        let svc = Service::with_database(Memory::new());
        let cashier = fixture::user(Role::Cashier);
        let vehicle = fixture::vehicle(Status::ReadyToSell);
        svc.database().execute(Insert(cashier.clone())).await.unwrap();
        svc.database().execute(Insert(vehicle.clone())).await.unwrap();

        let err = svc
            .execute(ApproveVehiclePrice {
                vehicle_id: vehicle.id,
                price: Money::from(140_000_000),
                admin_id: cashier.id,
            })
            .await
            .unwrap_err();

        assert!(
            matches!(err.as_ref(), ExecutionError::UserNotAdmin(_)),
            "unexpected error: {err}",
        );
    }
}
