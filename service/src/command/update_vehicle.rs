//! [`Command`] for updating descriptive data of a [`Vehicle`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{vehicle, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for overwriting descriptive data of a [`Vehicle`].
///
/// Neither the chassis number nor the financial history of the [`Vehicle`]
/// is touched.
#[derive(Clone, Debug)]
pub struct UpdateVehicle {
    /// ID of the [`Vehicle`] to be updated.
    pub vehicle_id: vehicle::Id,

    /// New license plate of the [`Vehicle`].
    pub license_plate: Option<vehicle::LicensePlate>,

    /// New brand of the [`Vehicle`].
    pub brand: vehicle::Brand,

    /// New model of the [`Vehicle`].
    pub model: vehicle::Model,

    /// New model variant of the [`Vehicle`].
    pub variant: Option<vehicle::Variant>,

    /// New manufacturing year of the [`Vehicle`].
    pub year: vehicle::Year,

    /// New color of the [`Vehicle`].
    pub color: Option<vehicle::Color>,

    /// New odometer reading of the [`Vehicle`].
    pub mileage: Option<u32>,

    /// New fuel type of the [`Vehicle`].
    pub fuel_type: Option<vehicle::FuelType>,

    /// New transmission of the [`Vehicle`].
    pub transmission: Option<vehicle::Transmission>,

    /// New suggested selling price of the [`Vehicle`].
    pub suggested_selling_price: Option<Money>,

    /// New purchase notes of the [`Vehicle`].
    pub purchase_notes: Option<vehicle::Notes>,

    /// New condition notes of the [`Vehicle`].
    pub condition_notes: Option<vehicle::Notes>,
}

impl<Db> Command<UpdateVehicle> for Service<Db>
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

    async fn execute(&self, cmd: UpdateVehicle) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateVehicle {
            vehicle_id,
            license_plate,
            brand,
            model,
            variant,
            year,
            color,
            mileage,
            fuel_type,
            transmission,
            suggested_selling_price,
            purchase_notes,
            condition_notes,
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

        vehicle.license_plate = license_plate;
        vehicle.brand = brand;
        vehicle.model = model;
        vehicle.variant = variant;
        vehicle.year = year;
        vehicle.color = color;
        vehicle.mileage = mileage;
        vehicle.fuel_type = fuel_type;
        vehicle.transmission = transmission;
        vehicle.suggested_selling_price = suggested_selling_price;
        vehicle.purchase_notes = purchase_notes;
        vehicle.condition_notes = condition_notes;
        vehicle.touch();

        tx.execute(Update(vehicle.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(vehicle)
    }
}

/// Error of [`UpdateVehicle`] [`Command`] execution.
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
        Money,
    };

    use super::{ExecutionError, UpdateVehicle};
    use crate::{
        domain::{fixture, vehicle, Vehicle},
        infra::{database::Memory, Database as _},
        Command as _, Service,
    };

    fn command(vehicle_id: vehicle::Id) -> UpdateVehicle {
        UpdateVehicle {
            vehicle_id,
            license_plate: vehicle::LicensePlate::new("D 4321 ABC"),
            brand: vehicle::Brand::new("Toyota").unwrap(),
            model: vehicle::Model::new("Avanza").unwrap(),
            variant: vehicle::Variant::new("1.5 Veloz"),
            year: vehicle::Year::new(2020).unwrap(),
            color: vehicle::Color::new("Black"),
            mileage: Some(70_000),
            fuel_type: Some(vehicle::FuelType::Gasoline),
            transmission: Some(vehicle::Transmission::Automatic),
            suggested_selling_price: Some(Money::from(150_000_000)),
            purchase_notes: None,
            condition_notes: vehicle::Notes::new("Minor scratches"),
        }
    }

    #[tokio::test]
    async fn overwrites_descriptive_fields_only() {
        let svc = Service::with_database(Memory::new());
        let mut existing = fixture::vehicle(vehicle::Status::ReadyToSell);
        existing.total_repair_cost = Money::from(2_000_000);
        svc.database().execute(Insert(existing.clone())).await.unwrap();

        let updated = svc.execute(command(existing.id)).await.unwrap();

        assert_eq!(updated.year, vehicle::Year::new(2020).unwrap());
        assert_eq!(updated.mileage, Some(70_000));
        assert_eq!(updated.chassis_number, existing.chassis_number);
        assert_eq!(updated.code, existing.code);
        assert_eq!(updated.status, vehicle::Status::ReadyToSell);
        assert_eq!(updated.total_repair_cost, Money::from(2_000_000));

        let stored = svc
            .database()
            .execute(Select(By::<Option<Vehicle>, _>::new(existing.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            stored.suggested_selling_price,
            Some(Money::from(150_000_000)),
        );
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
