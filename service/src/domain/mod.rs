//! Domain definitions.

pub mod customer;
pub mod repair;
pub mod sequence;
pub mod spare_part;
pub mod stock_movement;
pub mod transaction;
pub mod user;
pub mod vehicle;

pub use self::{
    customer::Customer, repair::Repair, spare_part::SparePart,
    stock_movement::StockMovement, user::User, vehicle::Vehicle,
};

#[cfg(test)]
pub(crate) mod fixture {
    //! Ready-made domain values for tests.

    use common::{DateTime, Money};

    use super::{
        customer, repair, sequence, spare_part, user, vehicle, Customer,
        Repair, SparePart, User, Vehicle,
    };

    /// Creates a new [`Vehicle`] in the provided [`vehicle::Status`].
    pub(crate) fn vehicle(status: vehicle::Status) -> Vehicle {
        let now = DateTime::now();
        let id = vehicle::Id::new();
        Vehicle {
            id,
            code: sequence::Key::global(sequence::Prefix::Vehicle)
                .code(sequence::Value(1)),
            chassis_number: vehicle::ChassisNumber::new(format!("MHF{id}"))
                .unwrap(),
            license_plate: vehicle::LicensePlate::new("B 1234 XYZ"),
            brand: vehicle::Brand::new("Toyota").unwrap(),
            model: vehicle::Model::new("Avanza").unwrap(),
            variant: vehicle::Variant::new("1.3 G"),
            year: vehicle::Year::new(2019).unwrap(),
            color: vehicle::Color::new("Silver"),
            mileage: Some(65_000),
            fuel_type: Some(vehicle::FuelType::Gasoline),
            transmission: Some(vehicle::Transmission::Manual),
            purchase_price: Some(Money::from(120_000_000)),
            total_repair_cost: Money::ZERO,
            suggested_selling_price: None,
            approved_selling_price: None,
            final_selling_price: None,
            status,
            purchased_from: None,
            sold_to: None,
            purchased_by: None,
            sold_by: None,
            price_approved_by: None,
            purchased_at: Some(now.coerce()),
            sold_at: None,
            purchase_notes: None,
            condition_notes: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    /// Creates a new active [`SparePart`] with the provided stock and cost.
    pub(crate) fn spare_part(stock: u32, cost_price: Money) -> SparePart {
        let now = DateTime::now();
        SparePart {
            id: spare_part::Id::new(),
            code: sequence::Key::global(sequence::Prefix::SparePart)
                .code(sequence::Value(1)),
            name: spare_part::Name::new("Oil filter").unwrap(),
            description: None,
            brand: spare_part::Brand::new("Denso"),
            cost_price,
            selling_price: cost_price + Money::from(1000),
            stock_quantity: stock,
            min_stock_level: 0,
            unit_measure: spare_part::UnitMeasure::new("pcs"),
            created_at: now.coerce(),
            updated_at: now.coerce(),
            is_active: true,
        }
    }

    /// Creates a new [`Repair`] in the provided [`repair::Status`] of a new
    /// [`Vehicle`].
    pub(crate) fn repair(status: repair::Status) -> Repair {
        let now = DateTime::now();
        Repair {
            id: repair::Id::new(),
            number: sequence::Key::daily(sequence::Prefix::Repair, &now)
                .code(sequence::Value(1)),
            vehicle_id: vehicle::Id::new(),
            title: repair::Title::new("Engine tune-up").unwrap(),
            description: None,
            labor_cost: Money::ZERO,
            total_parts_cost: Money::ZERO,
            total_cost: Money::ZERO,
            status,
            mechanic_id: None,
            work_notes: None,
            started_at: None,
            completed_at: None,
            created_at: now.coerce(),
        }
    }

    /// Creates a new active individual [`Customer`].
    pub(crate) fn customer() -> Customer {
        let now = DateTime::now();
        Customer {
            id: customer::Id::new(),
            code: sequence::Key::global(sequence::Prefix::Customer)
                .code(sequence::Value(1)),
            name: customer::Name::new("Budi Santoso").unwrap(),
            phone: customer::Phone::new("081234567890"),
            email: customer::Email::new("budi@example.com"),
            address: None,
            id_card_number: None,
            kind: customer::Kind::Individual,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            is_active: true,
        }
    }

    /// Creates a new active [`User`] with the provided [`user::Role`].
    pub(crate) fn user(role: user::Role) -> User {
        User {
            id: user::Id::new(),
            username: user::Username::new(format!("{role}").to_lowercase())
                .unwrap(),
            full_name: user::FullName::new("Staff Member").unwrap(),
            role,
            is_active: true,
        }
    }
}
