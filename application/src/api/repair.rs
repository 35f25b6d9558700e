//! [`Repair`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

pub use self::part::Part;

/// A reconditioning job performed on a `Vehicle`.
#[derive(Clone, Debug, From)]
pub struct Repair(domain::Repair);

impl Repair {
    /// Loads the [`Repair`] with the provided ID.
    ///
    /// # Errors
    ///
    /// Errors if the [`Repair`] doesn't exist.
    pub(crate) async fn load(
        id: domain::repair::Id,
        ctx: &Context,
    ) -> Result<Self, Error> {
        ctx.service()
            .execute(query::repair::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .map(Self)
            .ok_or_else(|| api::NotExistsError::Repair.into())
            .map_err(ctx.error())
    }
}

/// A reconditioning job performed on a `Vehicle`.
#[graphql_object(context = Context)]
impl Repair {
    /// Unique identifier of this `Repair`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Human-readable number of this `Repair` (`REP-20240115-001`).
    pub fn number(&self) -> String {
        self.0.number.to_string()
    }

    /// `Vehicle` this `Repair` is performed on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Repair.vehicle",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn vehicle(&self, ctx: &Context) -> Result<api::Vehicle, Error> {
        api::Vehicle::load(self.0.vehicle_id, ctx).await
    }

    /// Title of this `Repair`.
    pub fn title(&self) -> Title {
        self.0.title.clone().into()
    }

    /// Description of this `Repair`.
    pub fn description(&self) -> Option<Description> {
        self.0.description.clone().map(Into::into)
    }

    /// Cost of the work of this `Repair`.
    pub fn labor_cost(&self) -> Money {
        self.0.labor_cost
    }

    /// Sum of all the `RepairPart`s of this `Repair`.
    pub fn total_parts_cost(&self) -> Money {
        self.0.total_parts_cost
    }

    /// Labor cost plus parts cost of this `Repair`.
    pub fn total_cost(&self) -> Money {
        self.0.total_cost
    }

    /// Current status of this `Repair`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Mechanic assigned to this `Repair`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Repair.mechanic",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn mechanic(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::User>, Error> {
        match self.0.mechanic_id {
            Some(id) => api::User::load(id, ctx).await.map(Some),
            None => Ok(None),
        }
    }

    /// Notes of the mechanic about this `Repair`.
    pub fn work_notes(&self) -> Option<WorkNotes> {
        self.0.work_notes.clone().map(Into::into)
    }

    /// `RepairPart`s consumed by this `Repair`, oldest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Repair.parts",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn parts(&self, ctx: &Context) -> Result<Vec<Part>, Error> {
        ctx.service()
            .execute(query::repair::Parts::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ps| ps.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when work on this `Repair` started.
    pub fn started_at(&self) -> Option<DateTime> {
        self.0.started_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `Repair` was completed.
    pub fn completed_at(&self) -> Option<DateTime> {
        self.0.completed_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `Repair` was opened.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Repair`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::repair::Id)]
#[into(domain::repair::Id)]
#[graphql(name = "RepairId", transparent)]
pub struct Id(Uuid);

/// Title of a `Repair`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RepairTitle",
    with = scalar::Via::<domain::repair::Title>,
)]
pub struct Title(domain::repair::Title);

/// Description of a `Repair`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RepairDescription",
    with = scalar::Via::<domain::repair::Description>,
)]
pub struct Description(domain::repair::Description);

/// Notes of a mechanic about a `Repair`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RepairWorkNotes",
    with = scalar::Via::<domain::repair::WorkNotes>,
)]
pub struct WorkNotes(domain::repair::WorkNotes);

/// Status of a `Repair`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "RepairStatus")]
pub enum Status {
    /// Opened, but not started yet.
    Pending,

    /// Being worked on.
    InProgress,

    /// Finished, its cost is added to the `Vehicle`.
    Completed,

    /// Abandoned.
    Cancelled,
}

impl From<domain::repair::Status> for Status {
    fn from(status: domain::repair::Status) -> Self {
        use domain::repair::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::InProgress => Self::InProgress,
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::repair::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::InProgress => Self::InProgress,
            Status::Completed => Self::Completed,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

pub mod part {
    //! [`Part`]-related definitions.

    use common::{DateTime, Money};
    use derive_more::{AsRef, Display, From, Into};
    use juniper::{graphql_object, GraphQLObject, GraphQLScalar};
    use service::{command, domain};
    use uuid::Uuid;

    use crate::{
        api::{self, scalar},
        Context, Error,
    };

    /// A line item of a `Repair` consuming units of a `SparePart`.
    #[derive(Clone, Debug, From)]
    pub struct Part(domain::repair::Part);

    /// A line item of a `Repair` consuming units of a `SparePart`.
    #[graphql_object(name = "RepairPart", context = Context)]
    impl Part {
        /// Unique identifier of this `RepairPart`.
        pub fn id(&self) -> Id {
            self.0.id.into()
        }

        /// `SparePart` consumed by this `RepairPart`.
        #[tracing::instrument(
            skip_all,
            fields(
                gql.name = "RepairPart.sparePart",
                otel.name = api::Query::SPAN_NAME,
            ),
        )]
        pub async fn spare_part(
            &self,
            ctx: &Context,
        ) -> Result<api::SparePart, Error> {
            api::SparePart::load(self.0.spare_part_id, ctx).await
        }

        /// Number of consumed units.
        pub fn quantity(&self) -> i32 {
            api::int(self.0.quantity.get())
        }

        /// Cost of a single unit at the moment of consumption.
        pub fn unit_cost(&self) -> Money {
            self.0.unit_cost
        }

        /// Cost of all the consumed units.
        pub fn total_cost(&self) -> Money {
            self.0.total_cost
        }

        /// Notes about this `RepairPart`.
        pub fn notes(&self) -> Option<Notes> {
            self.0.notes.clone().map(Into::into)
        }

        /// `DateTime` when the units were consumed.
        pub fn used_at(&self) -> DateTime {
            self.0.used_at.coerce()
        }
    }

    /// Unique identifier of a `RepairPart`.
    #[derive(
        Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
    )]
    #[from(domain::repair::part::Id)]
    #[into(domain::repair::part::Id)]
    #[graphql(name = "RepairPartId", transparent)]
    pub struct Id(Uuid);

    /// Notes about a `RepairPart`.
    #[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
    #[graphql(
        name = "RepairPartNotes",
        with = scalar::Via::<domain::repair::part::Notes>,
    )]
    pub struct Notes(domain::repair::part::Notes);

    /// Result of adding a `RepairPart` to a `Repair`.
    #[derive(Clone, Debug, GraphQLObject)]
    #[graphql(context = Context, name = "AddRepairPartResult")]
    pub struct AddResult {
        /// `Repair` with the recomputed costs.
        pub repair: api::Repair,

        /// Added `RepairPart`.
        pub part: Part,
    }

    impl From<command::add_repair_part::Output> for AddResult {
        fn from(output: command::add_repair_part::Output) -> Self {
            let command::add_repair_part::Output { repair, part } = output;
            Self {
                repair: repair.into(),
                part: part.into(),
            }
        }
    }
}

pub mod list {
    //! Definitions related to the [`Repair`] list.

    use derive_more::From;
    use juniper::graphql_object;
    use service::read;

    use super::Repair;
    use crate::{api, AsError, Context, Error};

    /// Page of the [`Repair`] list.
    #[derive(Clone, Debug, From)]
    pub struct Page(read::repair::list::Page);

    /// Page of the `Repair` list, newest first.
    #[graphql_object(name = "RepairPage", context = Context)]
    impl Page {
        /// `Repair`s on this page.
        #[must_use]
        pub fn items(&self) -> Vec<Repair> {
            self.0.items.iter().cloned().map(Into::into).collect()
        }

        /// Total count of the `Repair`s matching the request.
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

        /// Maximum number of `Repair`s on this page.
        #[must_use]
        pub fn limit(&self) -> i32 {
            api::int(self.0.arguments.limit())
        }
    }
}
