//! [`SparePart`] definitions.

use std::num::NonZeroU32;

#[cfg(doc)]
use common::DateTime;
use common::{define_text, unit, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::sequence;

/// Spare part kept in the dealership's inventory.
#[derive(Clone, Debug)]
pub struct SparePart {
    /// ID of this [`SparePart`].
    pub id: Id,

    /// Human-readable [`Code`] of this [`SparePart`].
    pub code: Code,

    /// [`Name`] of this [`SparePart`].
    pub name: Name,

    /// [`Description`] of this [`SparePart`].
    pub description: Option<Description>,

    /// [`Brand`] of this [`SparePart`].
    pub brand: Option<Brand>,

    /// Price this [`SparePart`] is bought for.
    ///
    /// Snapshotted onto repair line items when consumed.
    pub cost_price: Money,

    /// Price this [`SparePart`] is sold for.
    pub selling_price: Money,

    /// Number of units currently in stock.
    pub stock_quantity: u32,

    /// Advisory number of units below which the stock should be replenished.
    pub min_stock_level: u32,

    /// [`UnitMeasure`] of this [`SparePart`] stock.
    pub unit_measure: Option<UnitMeasure>,

    /// [`DateTime`] when this [`SparePart`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`SparePart`] was modified the last time.
    pub updated_at: ModificationDateTime,

    /// Indicator whether this [`SparePart`] wasn't deleted.
    pub is_active: bool,
}

impl SparePart {
    /// Takes the provided [`Quantity`] out of the stock of this [`SparePart`].
    ///
    /// Returns the current [`SparePart::cost_price`] to be used as the unit
    /// cost of the consumed units.
    ///
    /// # Errors
    ///
    /// With [`InsufficientStock`] if the stock doesn't have enough units. The
    /// stock is left untouched then.
    pub fn reserve(&mut self, qty: Quantity) -> Result<Money, InsufficientStock> {
        let requested = qty.get();
        self.stock_quantity = self
            .stock_quantity
            .checked_sub(requested)
            .ok_or(InsufficientStock {
                available: self.stock_quantity,
                requested,
            })?;
        self.touch();
        Ok(self.cost_price)
    }

    /// Puts the provided [`Quantity`] back into the stock of this
    /// [`SparePart`].
    ///
    /// # Errors
    ///
    /// With [`StockOverflow`] if the stock cannot count that many units. The
    /// stock is left untouched then.
    pub fn release(&mut self, qty: Quantity) -> Result<(), StockOverflow> {
        let released = qty.get();
        self.stock_quantity = self
            .stock_quantity
            .checked_add(released)
            .ok_or(StockOverflow {
                available: self.stock_quantity,
                released,
            })?;
        self.touch();
        Ok(())
    }

    /// Indicates whether the stock of this [`SparePart`] is at or below its
    /// [`SparePart::min_stock_level`].
    #[must_use]
    pub fn is_low_on_stock(&self) -> bool {
        self.stock_quantity <= self.min_stock_level
    }

    /// Bumps [`SparePart::updated_at`].
    pub(crate) fn touch(&mut self) {
        self.updated_at = ModificationDateTime::now();
    }
}

/// Error of reserving more units than a [`SparePart`] has in stock.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("requested {requested} units, but only {available} in stock")]
pub struct InsufficientStock {
    /// Number of units in stock.
    pub available: u32,

    /// Number of units requested.
    pub requested: u32,
}

/// Error of putting back more units than a [`SparePart`] stock can count.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("cannot put back {released} units onto {available} in stock")]
pub struct StockOverflow {
    /// Number of units in stock.
    pub available: u32,

    /// Number of units being put back.
    pub released: u32,
}

/// ID of a [`SparePart`].
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

/// Human-readable code of a [`SparePart`] (`PART-001`).
pub type Code = sequence::Code<SparePart>;

/// Positive number of [`SparePart`] units.
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// Creates a new [`Quantity`] if the provided one is positive.
    #[must_use]
    pub fn new(qty: u32) -> Option<Self> {
        NonZeroU32::new(qty).map(Self)
    }

    /// Returns the number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

define_text! {
    #[doc = "Name of a [`SparePart`]."]
    struct Name(max_len = 255);
}

define_text! {
    #[doc = "Description of a [`SparePart`]."]
    struct Description(max_len = 4096);
}

define_text! {
    #[doc = "Brand of a [`SparePart`]."]
    struct Brand(max_len = 100);
}

define_text! {
    #[doc = "Unit a [`SparePart`] stock is measured in (`pcs`, `liter`)."]
    struct UnitMeasure(max_len = 20);
}

/// [`DateTime`] when a [`SparePart`] was created.
pub type CreationDateTime = DateTimeOf<(SparePart, unit::Creation)>;

/// [`DateTime`] when a [`SparePart`] was modified the last time.
pub type ModificationDateTime = DateTimeOf<(SparePart, unit::Modification)>;

#[cfg(test)]
mod spec {
    use common::Money;

    use super::{InsufficientStock, Quantity, StockOverflow};
    use crate::domain::fixture;

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[test]
    fn quantity_is_positive() {
        assert!(Quantity::new(0).is_none());
        assert_eq!(qty(3).get(), 3);
    }

    #[test]
    fn reserves_stock() {
        let mut part = fixture::spare_part(5, Money::from(5000));

        assert_eq!(part.reserve(qty(3)), Ok(Money::from(5000)));
        assert_eq!(part.stock_quantity, 2);

        assert_eq!(
            part.reserve(qty(3)),
            Err(InsufficientStock {
                available: 2,
                requested: 3,
            }),
        );
        assert_eq!(part.stock_quantity, 2);

        assert_eq!(part.reserve(qty(2)), Ok(Money::from(5000)));
        assert_eq!(part.stock_quantity, 0);
    }

    #[test]
    fn releases_stock() {
        let mut part = fixture::spare_part(2, Money::from(5000));
        part.min_stock_level = 1;

        assert_eq!(part.release(qty(3)), Ok(()));
        assert_eq!(part.stock_quantity, 5);

        assert_eq!(part.release(qty(u32::MAX - 5)), Ok(()));
        assert_eq!(part.stock_quantity, u32::MAX);
    }

    #[test]
    fn refuses_to_overflow_stock() {
        let mut part = fixture::spare_part(u32::MAX - 1, Money::from(5000));

        assert_eq!(
            part.release(qty(2)),
            Err(StockOverflow {
                available: u32::MAX - 1,
                released: 2,
            }),
        );
        assert_eq!(part.stock_quantity, u32::MAX - 1);
    }

    #[test]
    fn low_stock() {
        let mut part = fixture::spare_part(3, Money::from(1));
        part.min_stock_level = 2;
        assert!(!part.is_low_on_stock());

        part.stock_quantity = 2;
        assert!(part.is_low_on_stock());
    }
}
