//! [`Sale`] definitions.

use common::{DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::{Customer, User, Vehicle};
use crate::domain::{customer, sequence, user, vehicle};

use super::{Invoice, Notes, PaymentMethod, PaymentReference, Status};

/// Immutable record of the dealership selling a [`Vehicle`] to a
/// [`Customer`].
#[derive(Clone, Debug)]
pub struct Sale {
    /// ID of this [`Sale`].
    pub id: Id,

    /// Human-readable [`Number`] of this [`Sale`].
    pub number: Number,

    /// [`InvoiceNumber`] of this [`Sale`].
    pub invoice_number: InvoiceNumber,

    /// ID of the sold [`Vehicle`].
    pub vehicle_id: vehicle::Id,

    /// ID of the [`Customer`] buying the [`Vehicle`].
    pub customer_id: customer::Id,

    /// Price the [`Vehicle`] is sold for.
    pub vehicle_price: Money,

    /// Tax charged on top of the [`Sale::vehicle_price`].
    pub tax_amount: Money,

    /// Discount granted to the [`Customer`].
    pub discount_amount: Money,

    /// Amount the [`Customer`] pays, see [`Sale::total()`].
    pub total_amount: Money,

    /// [`PaymentMethod`] of this [`Sale`].
    pub payment_method: PaymentMethod,

    /// [`PaymentReference`] of this [`Sale`].
    pub payment_reference: Option<PaymentReference>,

    /// ID of the [`User`] who processed this [`Sale`].
    pub cashier_id: user::Id,

    /// [`Status`] of this [`Sale`].
    pub status: Status,

    /// [`Notes`] about this [`Sale`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`Sale`] happened.
    ///
    /// [`DateTime`]: common::DateTime
    pub transacted_at: TransactionDateTime,
}

impl Sale {
    /// Computes the total amount of a [`Sale`].
    ///
    /// The result is not clamped, so a discount exceeding the price and the
    /// tax yields a negative total.
    #[must_use]
    pub fn total(
        vehicle_price: Money,
        tax_amount: Money,
        discount_amount: Money,
    ) -> Money {
        vehicle_price + tax_amount - discount_amount
    }
}

/// ID of a [`Sale`].
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

/// Human-readable number of a [`Sale`] (`SAL-20240115-001`).
pub type Number = sequence::Code<Sale>;

/// Invoice number of a [`Sale`] (`INV-SAL-20240115-001`).
pub type InvoiceNumber = sequence::Code<(Sale, Invoice)>;

/// [`DateTime`] when a [`Sale`] happened.
///
/// [`DateTime`]: common::DateTime
pub type TransactionDateTime = DateTimeOf<Sale>;

#[cfg(test)]
mod spec {
    use common::Money;

    use super::Sale;

    #[test]
    fn total_is_not_clamped() {
        assert_eq!(
            Sale::total(
                Money::from(150_000_000),
                Money::from(15_000_000),
                Money::from(5_000_000),
            ),
            Money::from(160_000_000),
        );
        assert_eq!(
            Sale::total(Money::from(100), Money::from(10), Money::from(500)),
            -Money::from(390),
        );
    }
}
