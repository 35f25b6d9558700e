//! [`Vehicle`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A used vehicle passing through the showroom.
#[derive(Clone, Debug, From)]
pub struct Vehicle(domain::Vehicle);

impl Vehicle {
    /// Loads the [`Vehicle`] with the provided ID.
    ///
    /// # Errors
    ///
    /// Errors if the [`Vehicle`] doesn't exist.
    pub(crate) async fn load(
        id: domain::vehicle::Id,
        ctx: &Context,
    ) -> Result<Self, Error> {
        ctx.service()
            .execute(query::vehicle::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .map(Self)
            .ok_or_else(|| api::NotExistsError::Vehicle.into())
            .map_err(ctx.error())
    }
}

/// A used vehicle passing through the showroom.
#[graphql_object(context = Context)]
impl Vehicle {
    /// Unique identifier of this `Vehicle`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Human-readable code of this `Vehicle` (`VEH-001`).
    pub fn code(&self) -> String {
        self.0.code.to_string()
    }

    /// Chassis (VIN) number of this `Vehicle`.
    pub fn chassis_number(&self) -> ChassisNumber {
        self.0.chassis_number.clone().into()
    }

    /// License plate of this `Vehicle`.
    pub fn license_plate(&self) -> Option<LicensePlate> {
        self.0.license_plate.clone().map(Into::into)
    }

    /// Brand of this `Vehicle`.
    pub fn brand(&self) -> Brand {
        self.0.brand.clone().into()
    }

    /// Model of this `Vehicle`.
    pub fn model(&self) -> Model {
        self.0.model.clone().into()
    }

    /// Variant of this `Vehicle` model.
    pub fn variant(&self) -> Option<Variant> {
        self.0.variant.clone().map(Into::into)
    }

    /// Production year of this `Vehicle`.
    pub fn year(&self) -> i32 {
        u16::from(self.0.year).into()
    }

    /// Color of this `Vehicle`.
    pub fn color(&self) -> Option<Color> {
        self.0.color.clone().map(Into::into)
    }

    /// Odometer reading of this `Vehicle` in kilometers.
    pub fn mileage(&self) -> Option<i32> {
        self.0.mileage.map(api::int)
    }

    /// Fuel type of this `Vehicle`.
    pub fn fuel_type(&self) -> Option<FuelType> {
        self.0.fuel_type.map(Into::into)
    }

    /// Transmission of this `Vehicle`.
    pub fn transmission(&self) -> Option<Transmission> {
        self.0.transmission.map(Into::into)
    }

    /// Price this `Vehicle` was purchased for.
    pub fn purchase_price(&self) -> Option<Money> {
        self.0.purchase_price
    }

    /// Sum of all the completed repairs of this `Vehicle`.
    pub fn total_repair_cost(&self) -> Money {
        self.0.total_repair_cost
    }

    /// Selling price suggested for this `Vehicle`.
    pub fn suggested_selling_price(&self) -> Option<Money> {
        self.0.suggested_selling_price
    }

    /// Selling price approved by an administrator.
    pub fn approved_selling_price(&self) -> Option<Money> {
        self.0.approved_selling_price
    }

    /// Price this `Vehicle` was eventually sold for.
    pub fn final_selling_price(&self) -> Option<Money> {
        self.0.final_selling_price
    }

    /// Current status of this `Vehicle`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `Customer` this `Vehicle` was purchased from.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Vehicle.purchasedFrom",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn purchased_from(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Customer>, Error> {
        match self.0.purchased_from {
            Some(id) => api::Customer::load(id, ctx).await.map(Some),
            None => Ok(None),
        }
    }

    /// `Customer` this `Vehicle` was sold to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Vehicle.soldTo",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn sold_to(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Customer>, Error> {
        match self.0.sold_to {
            Some(id) => api::Customer::load(id, ctx).await.map(Some),
            None => Ok(None),
        }
    }

    /// `User` who recorded the purchase of this `Vehicle`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Vehicle.purchasedBy",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn purchased_by(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::User>, Error> {
        match self.0.purchased_by {
            Some(id) => api::User::load(id, ctx).await.map(Some),
            None => Ok(None),
        }
    }

    /// `User` who recorded the sale of this `Vehicle`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Vehicle.soldBy",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn sold_by(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::User>, Error> {
        match self.0.sold_by {
            Some(id) => api::User::load(id, ctx).await.map(Some),
            None => Ok(None),
        }
    }

    /// Administrator who approved the selling price of this `Vehicle`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Vehicle.priceApprovedBy",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price_approved_by(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::User>, Error> {
        match self.0.price_approved_by {
            Some(id) => api::User::load(id, ctx).await.map(Some),
            None => Ok(None),
        }
    }

    /// `DateTime` when this `Vehicle` was purchased.
    pub fn purchased_at(&self) -> Option<DateTime> {
        self.0.purchased_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `Vehicle` was sold.
    pub fn sold_at(&self) -> Option<DateTime> {
        self.0.sold_at.map(|at| at.coerce())
    }

    /// Notes taken when purchasing this `Vehicle`.
    pub fn purchase_notes(&self) -> Option<Notes> {
        self.0.purchase_notes.clone().map(Into::into)
    }

    /// Notes about the condition of this `Vehicle`.
    pub fn condition_notes(&self) -> Option<Notes> {
        self.0.condition_notes.clone().map(Into::into)
    }

    /// `DateTime` when this `Vehicle` was registered.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Vehicle` was modified last time.
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// Unique identifier of a `Vehicle`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::vehicle::Id)]
#[into(domain::vehicle::Id)]
#[graphql(name = "VehicleId", transparent)]
pub struct Id(Uuid);

/// Chassis (VIN) number of a `Vehicle`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "VehicleChassisNumber",
    with = scalar::Via::<domain::vehicle::ChassisNumber>,
)]
pub struct ChassisNumber(domain::vehicle::ChassisNumber);

/// License plate of a `Vehicle`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "VehicleLicensePlate",
    with = scalar::Via::<domain::vehicle::LicensePlate>,
)]
pub struct LicensePlate(domain::vehicle::LicensePlate);

/// Brand of a `Vehicle`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "VehicleBrand",
    with = scalar::Via::<domain::vehicle::Brand>,
)]
pub struct Brand(domain::vehicle::Brand);

/// Model of a `Vehicle`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "VehicleModel",
    with = scalar::Via::<domain::vehicle::Model>,
)]
pub struct Model(domain::vehicle::Model);

/// Variant of a `Vehicle` model.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "VehicleVariant",
    with = scalar::Via::<domain::vehicle::Variant>,
)]
pub struct Variant(domain::vehicle::Variant);

/// Color of a `Vehicle`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "VehicleColor",
    with = scalar::Via::<domain::vehicle::Color>,
)]
pub struct Color(domain::vehicle::Color);

/// Free-form notes about a `Vehicle`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "VehicleNotes",
    with = scalar::Via::<domain::vehicle::Notes>,
)]
pub struct Notes(domain::vehicle::Notes);

/// Converts the provided GraphQL year into a [`domain::vehicle::Year`].
///
/// # Errors
///
/// If the year is out of the supported range.
pub(crate) fn year(year: i32) -> Result<domain::vehicle::Year, Error> {
    u16::try_from(year)
        .ok()
        .and_then(domain::vehicle::Year::new)
        .ok_or_else(|| api::ValidationError::YearOutOfRange.into())
}

/// Status of a `Vehicle`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "VehicleStatus")]
pub enum Status {
    /// Acquired from a customer.
    Purchased,

    /// Being reconditioned.
    InRepair,

    /// Reconditioned and offered for sale.
    ReadyToSell,

    /// Held for a prospective buyer.
    Reserved,

    /// Sold to a customer.
    Sold,
}

impl From<domain::vehicle::Status> for Status {
    fn from(status: domain::vehicle::Status) -> Self {
        use domain::vehicle::Status as S;
        match status {
            S::Purchased => Self::Purchased,
            S::InRepair => Self::InRepair,
            S::ReadyToSell => Self::ReadyToSell,
            S::Reserved => Self::Reserved,
            S::Sold => Self::Sold,
        }
    }
}

impl From<Status> for domain::vehicle::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Purchased => Self::Purchased,
            Status::InRepair => Self::InRepair,
            Status::ReadyToSell => Self::ReadyToSell,
            Status::Reserved => Self::Reserved,
            Status::Sold => Self::Sold,
        }
    }
}

/// Fuel type of a `Vehicle`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "VehicleFuelType")]
pub enum FuelType {
    /// Gasoline engine.
    Gasoline,

    /// Diesel engine.
    Diesel,

    /// Battery electric.
    Electric,

    /// Hybrid powertrain.
    Hybrid,
}

impl From<domain::vehicle::FuelType> for FuelType {
    fn from(fuel: domain::vehicle::FuelType) -> Self {
        use domain::vehicle::FuelType as F;
        match fuel {
            F::Gasoline => Self::Gasoline,
            F::Diesel => Self::Diesel,
            F::Electric => Self::Electric,
            F::Hybrid => Self::Hybrid,
        }
    }
}

impl From<FuelType> for domain::vehicle::FuelType {
    fn from(fuel: FuelType) -> Self {
        match fuel {
            FuelType::Gasoline => Self::Gasoline,
            FuelType::Diesel => Self::Diesel,
            FuelType::Electric => Self::Electric,
            FuelType::Hybrid => Self::Hybrid,
        }
    }
}

/// Transmission of a `Vehicle`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "VehicleTransmission")]
pub enum Transmission {
    /// Manual gearbox.
    Manual,

    /// Automatic gearbox.
    Automatic,

    /// Continuously variable transmission.
    Cvt,
}

impl From<domain::vehicle::Transmission> for Transmission {
    fn from(transmission: domain::vehicle::Transmission) -> Self {
        use domain::vehicle::Transmission as T;
        match transmission {
            T::Manual => Self::Manual,
            T::Automatic => Self::Automatic,
            T::Cvt => Self::Cvt,
        }
    }
}

impl From<Transmission> for domain::vehicle::Transmission {
    fn from(transmission: Transmission) -> Self {
        match transmission {
            Transmission::Manual => Self::Manual,
            Transmission::Automatic => Self::Automatic,
            Transmission::Cvt => Self::Cvt,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Vehicle`] list.

    use derive_more::From;
    use juniper::graphql_object;
    use service::read;

    use super::Vehicle;
    use crate::{api, AsError, Context, Error};

    /// Page of the [`Vehicle`] list.
    #[derive(Clone, Debug, From)]
    pub struct Page(read::vehicle::list::Page);

    /// Page of the `Vehicle` list, newest first.
    #[graphql_object(name = "VehiclePage", context = Context)]
    impl Page {
        /// `Vehicle`s on this page.
        #[must_use]
        pub fn items(&self) -> Vec<Vehicle> {
            self.0.items.iter().cloned().map(Into::into).collect()
        }

        /// Total count of the `Vehicle`s matching the request.
        pub fn total(&self, ctx: &Context) -> Result<i32, Error> {
            i32::try_from(self.0.total)
                .map_err(AsError::into_error)
                .map_err(ctx.error())
        }

        /// 1-based number of this page.
        #[must_use]
        pub fn page(&self) -> i32 {
            api::int(self.0.arguments.page())
        }

        /// Maximum number of `Vehicle`s on this page.
        #[must_use]
        pub fn limit(&self) -> i32 {
            api::int(self.0.arguments.limit())
        }
    }
}
