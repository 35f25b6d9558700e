//! [`Command`] for registering a new [`Vehicle`].

use common::{
    operations::{
        By, Commit, Increment, Insert, Lock, Select, Transact, Transacted,
    },
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{customer, sequence, user, vehicle, Customer, Vehicle},
    infra::{database, Database},
    Service,
};

use super::{next_code, Command};

/// [`Command`] for registering a new [`Vehicle`] acquired by the dealership.
///
/// The registered [`Vehicle`] is [`vehicle::Status::Purchased`] right away.
#[derive(Clone, Debug)]
pub struct CreateVehicle {
    /// Chassis number of the new [`Vehicle`].
    pub chassis_number: vehicle::ChassisNumber,

    /// License plate of the new [`Vehicle`].
    pub license_plate: Option<vehicle::LicensePlate>,

    /// Brand of the new [`Vehicle`].
    pub brand: vehicle::Brand,

    /// Model of the new [`Vehicle`].
    pub model: vehicle::Model,

    /// Model variant of the new [`Vehicle`].
    pub variant: Option<vehicle::Variant>,

    /// Manufacturing year of the new [`Vehicle`].
    pub year: vehicle::Year,

    /// Color of the new [`Vehicle`].
    pub color: Option<vehicle::Color>,

    /// Odometer reading of the new [`Vehicle`].
    pub mileage: Option<u32>,

    /// Fuel type of the new [`Vehicle`].
    pub fuel_type: Option<vehicle::FuelType>,

    /// Transmission of the new [`Vehicle`].
    pub transmission: Option<vehicle::Transmission>,

    /// Price the new [`Vehicle`] was bought for.
    pub purchase_price: Option<Money>,

    /// Selling price suggested for the new [`Vehicle`].
    pub suggested_selling_price: Option<Money>,

    /// ID of the [`Customer`] the new [`Vehicle`] was bought from.
    pub purchased_from: Option<customer::Id>,

    /// ID of the [`User`] who processed the purchase.
    ///
    /// [`User`]: crate::domain::User
    pub purchased_by: Option<user::Id>,

    /// Notes about the purchase.
    pub purchase_notes: Option<vehicle::Notes>,

    /// Notes about the condition of the new [`Vehicle`].
    pub condition_notes: Option<vehicle::Notes>,
}

impl<Db> Command<CreateVehicle> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Vehicle, vehicle::ChassisNumber>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Vehicle>, vehicle::ChassisNumber>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<
            Increment<By<sequence::Value, sequence::Key>>,
            Ok = sequence::Value,
            Err = Traced<database::Error>,
        > + Database<Insert<Vehicle>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vehicle;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateVehicle) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateVehicle {
            chassis_number,
            license_plate,
            brand,
            model,
            variant,
            year,
            color,
            mileage,
            fuel_type,
            transmission,
            purchase_price,
            suggested_selling_price,
            purchased_from,
            purchased_by,
            purchase_notes,
            condition_notes,
        } = cmd;

        if let Some(customer_id) = purchased_from {
            self.database()
                .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .filter(|c| c.is_active)
                .ok_or(E::CustomerNotExists(customer_id))
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent registration of the same chassis number.
        tx.execute(Lock(By::<Vehicle, _>::new(chassis_number.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let existing = tx
            .execute(Select(By::<Option<Vehicle>, _>::new(
                chassis_number.clone(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::ChassisNumberOccupied(chassis_number)));
        }

        let code = next_code(&tx, sequence::Key::global(sequence::Prefix::Vehicle))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let now = DateTime::now();
        let vehicle = Vehicle {
            id: vehicle::Id::new(),
            code,
            chassis_number,
            license_plate,
            brand,
            model,
            variant,
            year,
            color,
            mileage,
            fuel_type,
            transmission,
            purchase_price,
            total_repair_cost: Money::ZERO,
            suggested_selling_price,
            approved_selling_price: None,
            final_selling_price: None,
            status: vehicle::Status::Purchased,
            purchased_from,
            sold_to: None,
            purchased_by,
            sold_by: None,
            price_approved_by: None,
            purchased_at: Some(now.coerce()),
            sold_at: None,
            purchase_notes,
            condition_notes,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        tx.execute(Insert(vehicle.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Vehicle(id: {}, code: {})` registered",
            vehicle.id,
            vehicle.code,
        );

        Ok(vehicle)
    }
}

/// Error of [`CreateVehicle`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Vehicle`] with the provided chassis number is registered already.
    #[display("`Vehicle(chassis_number: {_0})` is registered already")]
    ChassisNumberOccupied(#[error(not(source))] vehicle::ChassisNumber),

    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use super::{CreateVehicle, ExecutionError};
    use crate::{
        domain::{fixture, vehicle, Vehicle},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    fn command(chassis_number: &str) -> CreateVehicle {
        CreateVehicle {
            chassis_number: vehicle::ChassisNumber::new(chassis_number)
                .unwrap(),
            license_plate: None,
            brand: vehicle::Brand::new("Honda").unwrap(),
            model: vehicle::Model::new("Jazz").unwrap(),
            variant: None,
            year: vehicle::Year::new(2017).unwrap(),
            color: None,
            mileage: Some(80_000),
            fuel_type: Some(vehicle::FuelType::Gasoline),
            transmission: Some(vehicle::Transmission::Automatic),
            purchase_price: None,
            suggested_selling_price: None,
            purchased_from: None,
            purchased_by: None,
            purchase_notes: None,
            condition_notes: None,
        }
    }

    #[tokio::test]
    async fn registers_purchased_vehicle_with_sequential_codes() {
        let svc = Service::with_database(Memory::new());

        let first = svc.execute(command("MHFAAA")).await.unwrap();
        let second = svc.execute(command("MHFBBB")).await.unwrap();

        assert_eq!(first.code.as_ref(), "VEH-001");
        assert_eq!(second.code.as_ref(), "VEH-002");
        assert_eq!(first.status, vehicle::Status::Purchased);
        assert!(first.purchased_at.is_some());

        let stored = svc
            .database()
            .execute(Select(By::<Option<Vehicle>, _>::new(first.id)))
            .await
            .unwrap();
        assert_eq!(stored.map(|v| v.code), Some(first.code));
    }

    #[tokio::test]
    async fn rejects_occupied_chassis_number() {
        let svc = Service::with_database(Memory::new());
        _ = svc.execute(command("MHFAAA")).await.unwrap();

        let err = svc.execute(command("MHFAAA")).await.unwrap_err();

        assert!(
            matches!(err.as_ref(), ExecutionError::ChassisNumberOccupied(_)),
            "unexpected error: {err}",
        );
    }

    #[tokio::test]
    async fn rejects_inactive_customer() {
        let svc = Service::with_database(Memory::new());
        let mut customer = fixture::customer();
        customer.is_active = false;
        svc.database().execute(Insert(customer.clone())).await.unwrap();

        let mut cmd = command("MHFAAA");
        cmd.purchased_from = Some(customer.id);
        let err = svc.execute(cmd).await.unwrap_err();

        assert!(
            matches!(
                err.as_ref(),
                ExecutionError::CustomerNotExists(id) if *id == customer.id,
            ),
            "unexpected error: {err}",
        );
    }
}
