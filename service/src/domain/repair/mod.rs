//! [`Repair`] definitions.

pub mod part;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, define_text, unit, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{sequence, user, vehicle};

pub use self::part::Part;

/// Reconditioning job performed on a [`Vehicle`].
///
/// [`Vehicle`]: crate::domain::Vehicle
#[derive(Clone, Debug)]
pub struct Repair {
    /// ID of this [`Repair`].
    pub id: Id,

    /// Human-readable [`Number`] of this [`Repair`].
    pub number: Number,

    /// ID of the repaired [`Vehicle`].
    ///
    /// [`Vehicle`]: crate::domain::Vehicle
    pub vehicle_id: vehicle::Id,

    /// [`Title`] of this [`Repair`].
    pub title: Title,

    /// [`Description`] of this [`Repair`].
    pub description: Option<Description>,

    /// Cost of the labor.
    pub labor_cost: Money,

    /// Sum of the [`Part::total_cost`]s of this [`Repair`].
    ///
    /// Derived by [`Repair::recompute_costs()`] only.
    pub total_parts_cost: Money,

    /// [`Repair::labor_cost`] plus [`Repair::total_parts_cost`].
    ///
    /// Derived by [`Repair::recompute_costs()`] only.
    pub total_cost: Money,

    /// Current [`Status`] of this [`Repair`].
    pub status: Status,

    /// ID of the mechanic assigned to this [`Repair`].
    pub mechanic_id: Option<user::Id>,

    /// Free-form [`WorkNotes`] of the mechanic.
    pub work_notes: Option<WorkNotes>,

    /// [`DateTime`] when this [`Repair`] was started.
    pub started_at: Option<StartDateTime>,

    /// [`DateTime`] when this [`Repair`] was completed.
    pub completed_at: Option<CompletionDateTime>,

    /// [`DateTime`] when this [`Repair`] was created.
    pub created_at: CreationDateTime,
}

impl Repair {
    /// Recomputes the derived costs of this [`Repair`] out of all its current
    /// `parts` and its [`Repair::labor_cost`].
    ///
    /// Costs are always resummed from scratch instead of being tracked
    /// incrementally.
    pub fn recompute_costs(&mut self, parts: &[Part]) {
        self.total_parts_cost = parts.iter().map(|p| p.total_cost).sum();
        self.total_cost = self.labor_cost + self.total_parts_cost;
    }

    /// Moves this [`Repair`] into the provided [`Status`], stamping
    /// [`Repair::started_at`] or [`Repair::completed_at`] when entering
    /// [`Status::InProgress`] or [`Status::Completed`] accordingly.
    ///
    /// # Errors
    ///
    /// With [`InvalidStatusTransition`] if the provided [`Status`] cannot
    /// follow the current one.
    pub fn transition(
        &mut self,
        to: Status,
    ) -> Result<(), InvalidStatusTransition> {
        use Status as S;

        let from = self.status;
        match (from, to) {
            (S::Pending, S::InProgress) => {
                self.started_at = Some(StartDateTime::now());
            }
            (S::InProgress, S::Completed) => {
                self.completed_at = Some(CompletionDateTime::now());
            }
            (S::Pending | S::InProgress, S::Cancelled) => {}
            (
                S::Pending | S::InProgress | S::Completed | S::Cancelled,
                S::Pending | S::InProgress | S::Completed | S::Cancelled,
            ) => return Err(InvalidStatusTransition { from, to }),
        }
        self.status = to;
        Ok(())
    }
}

/// Error of moving a [`Repair`] into a [`Status`] that cannot follow its
/// current one.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("`{from}` cannot be followed by `{to}`")]
pub struct InvalidStatusTransition {
    /// Current [`Status`] of the [`Repair`].
    pub from: Status,

    /// Requested [`Status`] of the [`Repair`].
    pub to: Status,
}

/// ID of a [`Repair`].
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

/// Human-readable number of a [`Repair`] (`REP-20240115-001`).
pub type Number = sequence::Code<Repair>;

define_text! {
    #[doc = "Title of a [`Repair`]."]
    struct Title(max_len = 255);
}

define_text! {
    #[doc = "Description of a [`Repair`]."]
    struct Description(max_len = 4096);
}

define_text! {
    #[doc = "Notes of a mechanic about a [`Repair`]."]
    struct WorkNotes(max_len = 4096);
}

define_kind! {
    #[doc = "Status of a [`Repair`]."]
    enum Status {
        #[doc = "Opened, but not started yet."]
        Pending = 1,

        #[doc = "Being worked on."]
        InProgress = 2,

        #[doc = "Finished."]
        Completed = 3,

        #[doc = "Abandoned."]
        Cancelled = 4,
    }
}

/// [`DateTime`] when a [`Repair`] was created.
pub type CreationDateTime = DateTimeOf<(Repair, unit::Creation)>;

/// [`DateTime`] when a [`Repair`] was started.
pub type StartDateTime = DateTimeOf<(Repair, unit::Start)>;

/// [`DateTime`] when a [`Repair`] was completed.
pub type CompletionDateTime = DateTimeOf<(Repair, unit::Completion)>;

#[cfg(test)]
mod spec {
    use common::Money;

    use super::{InvalidStatusTransition, Part, Status};
    use crate::domain::{fixture, spare_part};

    fn part(repair: &super::Repair, unit_cost: u32, qty: u32) -> Part {
        Part::new(
            repair.id,
            spare_part::Id::new(),
            spare_part::Quantity::new(qty).unwrap(),
            Money::from(unit_cost),
            None,
        )
    }

    #[test]
    fn recomputes_costs_from_scratch() {
        let mut repair = fixture::repair(Status::Pending);
        repair.labor_cost = Money::from(100_000);

        let parts = vec![part(&repair, 5000, 2)];
        repair.recompute_costs(&parts);
        assert_eq!(repair.total_parts_cost, Money::from(10_000));
        assert_eq!(repair.total_cost, Money::from(110_000));

        let parts = vec![part(&repair, 5000, 2), part(&repair, 250, 4)];
        repair.recompute_costs(&parts);
        assert_eq!(repair.total_parts_cost, Money::from(11_000));
        assert_eq!(repair.total_cost, Money::from(111_000));

        repair.recompute_costs(&[]);
        assert_eq!(repair.total_parts_cost, Money::ZERO);
        assert_eq!(repair.total_cost, Money::from(100_000));
    }

    #[test]
    fn stamps_transitions() {
        let mut repair = fixture::repair(Status::Pending);

        repair.transition(Status::InProgress).unwrap();
        assert_eq!(repair.status, Status::InProgress);
        assert!(repair.started_at.is_some());
        assert!(repair.completed_at.is_none());

        repair.transition(Status::Completed).unwrap();
        assert_eq!(repair.status, Status::Completed);
        assert!(repair.completed_at.is_some());
    }

    #[test]
    fn cancels_unfinished_only() {
        for from in [Status::Pending, Status::InProgress] {
            let mut repair = fixture::repair(from);
            repair.transition(Status::Cancelled).unwrap();
            assert_eq!(repair.status, Status::Cancelled);
        }

        for from in [Status::Completed, Status::Cancelled] {
            let mut repair = fixture::repair(from);
            assert_eq!(
                repair.transition(Status::Cancelled),
                Err(InvalidStatusTransition {
                    from,
                    to: Status::Cancelled,
                }),
            );
            assert_eq!(repair.status, from);
        }
    }

    #[test]
    fn rejects_skipping_and_going_back() {
        let cases = [
            (Status::Pending, Status::Completed),
            (Status::Pending, Status::Pending),
            (Status::InProgress, Status::Pending),
            (Status::InProgress, Status::InProgress),
            (Status::Completed, Status::InProgress),
            (Status::Completed, Status::Completed),
            (Status::Cancelled, Status::Pending),
        ];
        for (from, to) in cases {
            let mut repair = fixture::repair(from);
            assert_eq!(
                repair.transition(to),
                Err(InvalidStatusTransition { from, to }),
                "{from} -> {to}",
            );
        }
    }
}
