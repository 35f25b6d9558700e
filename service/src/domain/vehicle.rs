//! [`Vehicle`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, define_text, unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{customer, sequence, transaction, user};

/// Used vehicle moving through the dealership.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// ID of this [`Vehicle`].
    pub id: Id,

    /// Human-readable [`Code`] of this [`Vehicle`].
    pub code: Code,

    /// [`ChassisNumber`] of this [`Vehicle`], immutable once assigned.
    pub chassis_number: ChassisNumber,

    /// [`LicensePlate`] of this [`Vehicle`], if registered.
    pub license_plate: Option<LicensePlate>,

    /// [`Brand`] of this [`Vehicle`].
    pub brand: Brand,

    /// [`Model`] of this [`Vehicle`].
    pub model: Model,

    /// [`Variant`] of the [`Model`], if any.
    pub variant: Option<Variant>,

    /// [`Year`] this [`Vehicle`] was manufactured.
    pub year: Year,

    /// [`Color`] of this [`Vehicle`].
    pub color: Option<Color>,

    /// Mileage of this [`Vehicle`] in kilometers.
    pub mileage: Option<u32>,

    /// [`FuelType`] of this [`Vehicle`].
    pub fuel_type: Option<FuelType>,

    /// [`Transmission`] of this [`Vehicle`].
    pub transmission: Option<Transmission>,

    /// Price this [`Vehicle`] was purchased for.
    pub purchase_price: Option<Money>,

    /// Cumulative cost of all the completed repairs of this [`Vehicle`].
    pub total_repair_cost: Money,

    /// Selling price suggested by staff.
    pub suggested_selling_price: Option<Money>,

    /// Selling price approved by an administrator.
    pub approved_selling_price: Option<Money>,

    /// Price this [`Vehicle`] was finally sold for.
    pub final_selling_price: Option<Money>,

    /// Current [`Status`] of this [`Vehicle`].
    pub status: Status,

    /// ID of the customer this [`Vehicle`] was purchased from.
    pub purchased_from: Option<customer::Id>,

    /// ID of the customer this [`Vehicle`] was sold to.
    pub sold_to: Option<customer::Id>,

    /// ID of the cashier who processed the purchase.
    pub purchased_by: Option<user::Id>,

    /// ID of the cashier who processed the sale.
    pub sold_by: Option<user::Id>,

    /// ID of the administrator who approved the selling price.
    pub price_approved_by: Option<user::Id>,

    /// [`DateTime`] when this [`Vehicle`] was purchased.
    pub purchased_at: Option<PurchaseDateTime>,

    /// [`DateTime`] when this [`Vehicle`] was sold.
    pub sold_at: Option<SaleDateTime>,

    /// Free-form [`Notes`] about the purchase.
    pub purchase_notes: Option<Notes>,

    /// Free-form [`Notes`] about the condition.
    pub condition_notes: Option<Notes>,

    /// [`DateTime`] when this [`Vehicle`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Vehicle`] was modified the last time.
    pub updated_at: ModificationDateTime,
}

impl Vehicle {
    /// Overwrites the [`Status`] of this [`Vehicle`].
    ///
    /// No transition is validated here: any [`Status`] may follow any other
    /// one, and callers are responsible for requesting a sensible one.
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.touch();
    }

    /// Adds the provided `delta` to the [`Vehicle::total_repair_cost`].
    ///
    /// Negative `delta` decreases the cost.
    pub fn accumulate_repair_cost(&mut self, delta: Money) {
        self.total_repair_cost += delta;
        self.touch();
    }

    /// Indicates whether this [`Vehicle`] may be sold in its current
    /// [`Status`].
    #[must_use]
    pub fn is_available_for_sale(&self) -> bool {
        matches!(self.status, Status::ReadyToSell | Status::Reserved)
    }

    /// Writes the provided [`transaction::Purchase`] back onto this
    /// [`Vehicle`], making it [`Status::Purchased`].
    pub fn record_purchase(&mut self, purchase: &transaction::Purchase) {
        self.purchase_price = Some(purchase.vehicle_price);
        self.purchased_from = Some(purchase.customer_id);
        self.purchased_by = Some(purchase.cashier_id);
        self.purchased_at = Some(purchase.transacted_at.coerce());
        self.set_status(Status::Purchased);
    }

    /// Writes the provided [`transaction::Sale`] back onto this [`Vehicle`],
    /// making it [`Status::Sold`].
    pub fn record_sale(&mut self, sale: &transaction::Sale) {
        self.final_selling_price = Some(sale.vehicle_price);
        self.sold_to = Some(sale.customer_id);
        self.sold_by = Some(sale.cashier_id);
        self.sold_at = Some(sale.transacted_at.coerce());
        self.set_status(Status::Sold);
    }

    /// Records the selling `price` approved by the provided administrator.
    pub fn approve_price(&mut self, price: Money, admin_id: user::Id) {
        self.approved_selling_price = Some(price);
        self.price_approved_by = Some(admin_id);
        self.touch();
    }

    /// Bumps [`Vehicle::updated_at`].
    pub(crate) fn touch(&mut self) {
        self.updated_at = ModificationDateTime::now();
    }
}

/// ID of a [`Vehicle`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Human-readable code of a [`Vehicle`] (`VEH-001`).
pub type Code = sequence::Code<Vehicle>;

define_text! {
    #[doc = "Chassis (VIN) number of a [`Vehicle`]."]
    struct ChassisNumber(max_len = 50);
}

define_text! {
    #[doc = "License plate of a [`Vehicle`]."]
    struct LicensePlate(max_len = 20);
}

define_text! {
    #[doc = "Brand of a [`Vehicle`]."]
    struct Brand(max_len = 100);
}

define_text! {
    #[doc = "Model of a [`Vehicle`]."]
    struct Model(max_len = 100);
}

define_text! {
    #[doc = "Variant of a [`Vehicle`] model."]
    struct Variant(max_len = 100);
}

define_text! {
    #[doc = "Color of a [`Vehicle`]."]
    struct Color(max_len = 50);
}

define_text! {
    #[doc = "Free-form notes about a [`Vehicle`]."]
    struct Notes(max_len = 4096);
}

/// Manufacturing year of a [`Vehicle`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd)]
pub struct Year(u16);

impl Year {
    /// Earliest accepted [`Year`].
    pub const MIN: u16 = 1900;

    /// Latest accepted [`Year`].
    pub const MAX: u16 = 2100;

    /// Creates a new [`Year`] if the provided one is in the accepted range.
    #[must_use]
    pub fn new(year: u16) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&year).then_some(Self(year))
    }
}

define_kind! {
    #[doc = "Status of a [`Vehicle`] in the dealership."]
    enum Status {
        #[doc = "Acquired from a customer."]
        Purchased = 1,

        #[doc = "Being reconditioned."]
        InRepair = 2,

        #[doc = "Reconditioned and offered for sale."]
        ReadyToSell = 3,

        #[doc = "Held for a prospective buyer."]
        Reserved = 4,

        #[doc = "Sold to a customer."]
        Sold = 5,
    }
}

define_kind! {
    #[doc = "Fuel type of a [`Vehicle`]."]
    enum FuelType {
        #[doc = "Gasoline engine."]
        Gasoline = 1,

        #[doc = "Diesel engine."]
        Diesel = 2,

        #[doc = "Battery electric."]
        Electric = 3,

        #[doc = "Hybrid powertrain."]
        Hybrid = 4,
    }
}

define_kind! {
    #[doc = "Transmission of a [`Vehicle`]."]
    enum Transmission {
        #[doc = "Manual gearbox."]
        Manual = 1,

        #[doc = "Automatic gearbox."]
        Automatic = 2,

        #[doc = "Continuously variable transmission."]
        Cvt = 3,
    }
}

/// [`DateTime`] when a [`Vehicle`] was created.
pub type CreationDateTime = DateTimeOf<(Vehicle, unit::Creation)>;

/// [`DateTime`] when a [`Vehicle`] was modified the last time.
pub type ModificationDateTime = DateTimeOf<(Vehicle, unit::Modification)>;

/// [`DateTime`] when a [`Vehicle`] was purchased.
pub type PurchaseDateTime = DateTimeOf<(Vehicle, transaction::Purchase)>;

/// [`DateTime`] when a [`Vehicle`] was sold.
pub type SaleDateTime = DateTimeOf<(Vehicle, transaction::Sale)>;

#[cfg(test)]
mod spec {
    use common::Money;

    use super::{Status, Year};
    use crate::domain::fixture;

    #[test]
    fn set_status_accepts_any_transition() {
        let mut vehicle = fixture::vehicle(Status::Sold);

        vehicle.set_status(Status::Purchased);
        assert_eq!(vehicle.status, Status::Purchased);

        vehicle.set_status(Status::Sold);
        vehicle.set_status(Status::InRepair);
        assert_eq!(vehicle.status, Status::InRepair);
    }

    #[test]
    fn accumulates_repair_cost_both_ways() {
        let mut vehicle = fixture::vehicle(Status::InRepair);

        vehicle.accumulate_repair_cost(Money::from(110_000));
        vehicle.accumulate_repair_cost(Money::from(500));
        assert_eq!(vehicle.total_repair_cost, Money::from(110_500));

        vehicle.accumulate_repair_cost(-Money::from(500));
        assert_eq!(vehicle.total_repair_cost, Money::from(110_000));
    }

    #[test]
    fn availability_for_sale() {
        for status in Status::ALL.iter().copied() {
            let vehicle = fixture::vehicle(status);
            assert_eq!(
                vehicle.is_available_for_sale(),
                matches!(status, Status::ReadyToSell | Status::Reserved),
                "{status}",
            );
        }
    }

    #[test]
    fn approves_price() {
        let mut vehicle = fixture::vehicle(Status::ReadyToSell);
        let admin = crate::domain::user::Id::new();

        vehicle.approve_price(Money::from(150_000), admin);
        assert_eq!(vehicle.approved_selling_price, Some(Money::from(150_000)));
        assert_eq!(vehicle.price_approved_by, Some(admin));
        assert_eq!(vehicle.status, Status::ReadyToSell);
    }

    #[test]
    fn year_range() {
        assert!(Year::new(1899).is_none());
        assert!(Year::new(1900).is_some());
        assert!(Year::new(2024).is_some());
        assert!(Year::new(2101).is_none());
    }
}
