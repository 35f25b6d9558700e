//! [`Purchase`] definitions.

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

/// Immutable record of the dealership buying a [`Vehicle`] from a
/// [`Customer`].
#[derive(Clone, Debug)]
pub struct Purchase {
    /// ID of this [`Purchase`].
    pub id: Id,

    /// Human-readable [`Number`] of this [`Purchase`].
    pub number: Number,

    /// [`InvoiceNumber`] of this [`Purchase`].
    pub invoice_number: InvoiceNumber,

    /// ID of the purchased [`Vehicle`].
    pub vehicle_id: vehicle::Id,

    /// ID of the [`Customer`] selling the [`Vehicle`].
    pub customer_id: customer::Id,

    /// Price paid for the [`Vehicle`].
    pub vehicle_price: Money,

    /// Tax paid on top of the [`Purchase::vehicle_price`].
    pub tax_amount: Money,

    /// [`Purchase::vehicle_price`] plus [`Purchase::tax_amount`].
    pub total_amount: Money,

    /// [`PaymentMethod`] of this [`Purchase`].
    pub payment_method: PaymentMethod,

    /// [`PaymentReference`] of this [`Purchase`].
    pub payment_reference: Option<PaymentReference>,

    /// ID of the [`User`] who processed this [`Purchase`].
    pub cashier_id: user::Id,

    /// [`Status`] of this [`Purchase`].
    pub status: Status,

    /// [`Notes`] about this [`Purchase`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`Purchase`] happened.
    ///
    /// [`DateTime`]: common::DateTime
    pub transacted_at: TransactionDateTime,
}

impl Purchase {
    /// Computes the total amount of a [`Purchase`].
    #[must_use]
    pub fn total(vehicle_price: Money, tax_amount: Money) -> Money {
        vehicle_price + tax_amount
    }
}

/// ID of a [`Purchase`].
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

/// Human-readable number of a [`Purchase`] (`PUR-20240115-001`).
pub type Number = sequence::Code<Purchase>;

/// Invoice number of a [`Purchase`] (`INV-PUR-20240115-001`).
pub type InvoiceNumber = sequence::Code<(Purchase, Invoice)>;

/// [`DateTime`] when a [`Purchase`] happened.
///
/// [`DateTime`]: common::DateTime
pub type TransactionDateTime = DateTimeOf<Purchase>;
