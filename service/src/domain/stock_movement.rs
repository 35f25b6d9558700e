//! [`StockMovement`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, define_text, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::SparePart;
use crate::domain::spare_part;

/// Journal entry of a change of a [`SparePart`] stock.
#[derive(Clone, Debug)]
pub struct StockMovement {
    /// ID of this [`StockMovement`].
    pub id: Id,

    /// ID of the [`SparePart`] whose stock has changed.
    pub spare_part_id: spare_part::Id,

    /// [`Kind`] of this [`StockMovement`].
    pub kind: Kind,

    /// [`ReferenceKind`] of the entity causing this [`StockMovement`].
    pub reference_kind: ReferenceKind,

    /// ID of the entity causing this [`StockMovement`], if any.
    pub reference_id: Option<Uuid>,

    /// Stock before this [`StockMovement`].
    pub quantity_before: u32,

    /// Number of moved units.
    pub quantity_moved: u32,

    /// Stock after this [`StockMovement`].
    pub quantity_after: u32,

    /// [`Notes`] about this [`StockMovement`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`StockMovement`] happened.
    pub moved_at: MovementDateTime,
}

impl StockMovement {
    /// Creates a new [`StockMovement`] of the given [`SparePart`] stock from
    /// `before` to `after`.
    ///
    /// [`StockMovement::quantity_moved`] is the absolute difference between
    /// them.
    #[must_use]
    pub fn new(
        spare_part_id: spare_part::Id,
        kind: Kind,
        (reference_kind, reference_id): (ReferenceKind, Option<Uuid>),
        before: u32,
        after: u32,
        notes: Option<Notes>,
    ) -> Self {
        Self {
            id: Id::new(),
            spare_part_id,
            kind,
            reference_kind,
            reference_id,
            quantity_before: before,
            quantity_moved: before.abs_diff(after),
            quantity_after: after,
            notes,
            moved_at: MovementDateTime::now(),
        }
    }
}

/// ID of a [`StockMovement`].
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

define_kind! {
    #[doc = "Direction of a [`StockMovement`]."]
    enum Kind {
        #[doc = "Units returned to the stock."]
        In = 1,

        #[doc = "Units taken from the stock."]
        Out = 2,

        #[doc = "Stock set to an absolute value."]
        Adjustment = 3,
    }
}

define_kind! {
    #[doc = "Kind of an entity causing a [`StockMovement`]."]
    enum ReferenceKind {
        #[doc = "Repair consuming or returning parts."]
        Repair = 1,

        #[doc = "Purchase of parts."]
        Purchase = 2,

        #[doc = "Sale of parts."]
        Sale = 3,

        #[doc = "Manual adjustment."]
        Adjustment = 4,
    }
}

define_text! {
    #[doc = "Notes about a [`StockMovement`]."]
    struct Notes(max_len = 1024);
}

/// [`DateTime`] when a [`StockMovement`] happened.
pub type MovementDateTime = DateTimeOf<StockMovement>;

#[cfg(test)]
mod spec {
    use super::{Kind, ReferenceKind, StockMovement};
    use crate::domain::spare_part;

    #[test]
    fn moved_quantity_is_absolute() {
        let part = spare_part::Id::new();

        let out = StockMovement::new(
            part,
            Kind::Out,
            (ReferenceKind::Repair, None),
            5,
            2,
            None,
        );
        assert_eq!(
            (out.quantity_before, out.quantity_moved, out.quantity_after),
            (5, 3, 2),
        );

        let adjusted = StockMovement::new(
            part,
            Kind::Adjustment,
            (ReferenceKind::Adjustment, None),
            2,
            10,
            None,
        );
        assert_eq!(adjusted.quantity_moved, 8);
    }
}
