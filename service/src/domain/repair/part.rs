//! [`Part`] definitions.

use common::{define_text, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::{Repair, SparePart};
use crate::domain::{repair, spare_part};

/// Line item of a [`Repair`] recording consumption of a [`SparePart`].
#[derive(Clone, Debug)]
pub struct Part {
    /// ID of this [`Part`].
    pub id: Id,

    /// ID of the [`Repair`] this [`Part`] belongs to.
    pub repair_id: repair::Id,

    /// ID of the consumed [`SparePart`].
    pub spare_part_id: spare_part::Id,

    /// Consumed [`spare_part::Quantity`].
    pub quantity: spare_part::Quantity,

    /// [`SparePart::cost_price`] at the moment of consumption.
    pub unit_cost: Money,

    /// [`Part::unit_cost`] multiplied by [`Part::quantity`].
    pub total_cost: Money,

    /// [`Notes`] about this [`Part`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when the [`SparePart`] was consumed.
    ///
    /// [`DateTime`]: common::DateTime
    pub used_at: UsageDateTime,
}

impl Part {
    /// Creates a new [`Part`] consuming the provided `quantity` of a
    /// [`SparePart`] at the given `unit_cost`.
    #[must_use]
    pub fn new(
        repair_id: repair::Id,
        spare_part_id: spare_part::Id,
        quantity: spare_part::Quantity,
        unit_cost: Money,
        notes: Option<Notes>,
    ) -> Self {
        Self {
            id: Id::new(),
            repair_id,
            spare_part_id,
            quantity,
            unit_cost,
            total_cost: unit_cost * quantity.get(),
            notes,
            used_at: UsageDateTime::now(),
        }
    }
}

/// ID of a [`Part`].
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

define_text! {
    #[doc = "Notes about a [`Part`]."]
    struct Notes(max_len = 1024);
}

/// [`DateTime`] when a [`Part`] was used.
///
/// [`DateTime`]: common::DateTime
pub type UsageDateTime = DateTimeOf<(Part, Usage)>;

/// Marker of a [`Part`] usage.
#[derive(Clone, Copy, Debug)]
pub struct Usage;
