//! [`SparePart`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A spare part kept in the workshop stock.
#[derive(Clone, Debug, From)]
pub struct SparePart(domain::SparePart);

impl SparePart {
    /// Loads the [`SparePart`] with the provided ID, even a deleted one.
    ///
    /// # Errors
    ///
    /// Errors if the [`SparePart`] doesn't exist.
    pub(crate) async fn load(
        id: domain::spare_part::Id,
        ctx: &Context,
    ) -> Result<Self, Error> {
        ctx.service()
            .execute(query::spare_part::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .map(Self)
            .ok_or_else(|| api::NotExistsError::SparePart.into())
            .map_err(ctx.error())
    }
}

/// A spare part kept in the workshop stock.
#[graphql_object(context = Context)]
impl SparePart {
    /// Unique identifier of this `SparePart`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Human-readable code of this `SparePart` (`PART-001`).
    pub fn code(&self) -> String {
        self.0.code.to_string()
    }

    /// Name of this `SparePart`.
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Description of this `SparePart`.
    pub fn description(&self) -> Option<Description> {
        self.0.description.clone().map(Into::into)
    }

    /// Brand of this `SparePart`.
    pub fn brand(&self) -> Option<Brand> {
        self.0.brand.clone().map(Into::into)
    }

    /// Price a unit of this `SparePart` is bought for.
    pub fn cost_price(&self) -> Money {
        self.0.cost_price
    }

    /// Price a unit of this `SparePart` is sold for.
    pub fn selling_price(&self) -> Money {
        self.0.selling_price
    }

    /// Units of this `SparePart` currently in stock.
    pub fn stock_quantity(&self) -> i32 {
        api::int(self.0.stock_quantity)
    }

    /// Stock level at or below which this `SparePart` is low on stock.
    pub fn min_stock_level(&self) -> i32 {
        api::int(self.0.min_stock_level)
    }

    /// Indicator whether this `SparePart` is low on stock.
    pub fn is_low_on_stock(&self) -> bool {
        self.0.is_low_on_stock()
    }

    /// Unit the stock of this `SparePart` is measured in.
    pub fn unit_measure(&self) -> Option<UnitMeasure> {
        self.0.unit_measure.clone().map(Into::into)
    }

    /// Indicator whether this `SparePart` is not deleted.
    pub fn is_active(&self) -> bool {
        self.0.is_active
    }

    /// `StockMovement`s of this `SparePart`, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SparePart.movements",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn movements(
        &self,
        ctx: &Context,
    ) -> Result<Vec<StockMovement>, Error> {
        ctx.service()
            .execute(query::spare_part::Movements::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ms| ms.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when this `SparePart` was registered.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `SparePart` was modified last time.
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// Unique identifier of a `SparePart`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::spare_part::Id)]
#[into(domain::spare_part::Id)]
#[graphql(name = "SparePartId", transparent)]
pub struct Id(Uuid);

/// Name of a `SparePart`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SparePartName",
    with = scalar::Via::<domain::spare_part::Name>,
)]
pub struct Name(domain::spare_part::Name);

/// Description of a `SparePart`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SparePartDescription",
    with = scalar::Via::<domain::spare_part::Description>,
)]
pub struct Description(domain::spare_part::Description);

/// Brand of a `SparePart`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SparePartBrand",
    with = scalar::Via::<domain::spare_part::Brand>,
)]
pub struct Brand(domain::spare_part::Brand);

/// Unit the stock of a `SparePart` is measured in.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SparePartUnitMeasure",
    with = scalar::Via::<domain::spare_part::UnitMeasure>,
)]
pub struct UnitMeasure(domain::spare_part::UnitMeasure);

/// Converts the provided GraphQL quantity into a
/// [`domain::spare_part::Quantity`].
///
/// # Errors
///
/// If the quantity is not positive.
pub(crate) fn quantity(
    qty: i32,
) -> Result<domain::spare_part::Quantity, Error> {
    u32::try_from(qty)
        .ok()
        .and_then(domain::spare_part::Quantity::new)
        .ok_or_else(|| api::ValidationError::NonPositiveQuantity.into())
}

/// A single change of a [`SparePart`] stock.
#[derive(Clone, Debug, From)]
pub struct StockMovement(domain::StockMovement);

/// A single change of a `SparePart` stock.
#[graphql_object(context = Context)]
impl StockMovement {
    /// Unique identifier of this `StockMovement`.
    pub fn id(&self) -> Uuid {
        self.0.id.into()
    }

    /// Direction of this `StockMovement`.
    pub fn kind(&self) -> MovementKind {
        self.0.kind.into()
    }

    /// Kind of the entity caused this `StockMovement`.
    pub fn reference_kind(&self) -> MovementReferenceKind {
        self.0.reference_kind.into()
    }

    /// ID of the entity caused this `StockMovement`, if any.
    pub fn reference_id(&self) -> Option<Uuid> {
        self.0.reference_id
    }

    /// Stock before this `StockMovement`.
    pub fn quantity_before(&self) -> i32 {
        api::int(self.0.quantity_before)
    }

    /// Absolute number of units moved.
    pub fn quantity_moved(&self) -> i32 {
        api::int(self.0.quantity_moved)
    }

    /// Stock after this `StockMovement`.
    pub fn quantity_after(&self) -> i32 {
        api::int(self.0.quantity_after)
    }

    /// Notes about this `StockMovement`.
    pub fn notes(&self) -> Option<MovementNotes> {
        self.0.notes.clone().map(Into::into)
    }

    /// `DateTime` when this `StockMovement` happened.
    pub fn moved_at(&self) -> DateTime {
        self.0.moved_at.coerce()
    }
}

/// Notes about a `StockMovement`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "StockMovementNotes",
    with = scalar::Via::<domain::stock_movement::Notes>,
)]
pub struct MovementNotes(domain::stock_movement::Notes);

/// Direction of a `StockMovement`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "StockMovementKind")]
pub enum MovementKind {
    /// Units returned to the stock.
    In,

    /// Units taken from the stock.
    Out,

    /// Stock set to an absolute value.
    Adjustment,
}

impl From<domain::stock_movement::Kind> for MovementKind {
    fn from(kind: domain::stock_movement::Kind) -> Self {
        use domain::stock_movement::Kind as K;
        match kind {
            K::In => Self::In,
            K::Out => Self::Out,
            K::Adjustment => Self::Adjustment,
        }
    }
}

/// Kind of an entity causing a `StockMovement`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "StockMovementReferenceKind")]
pub enum MovementReferenceKind {
    /// Repair consuming or returning parts.
    Repair,

    /// Purchase of parts.
    Purchase,

    /// Sale of parts.
    Sale,

    /// Manual adjustment.
    Adjustment,
}

impl From<domain::stock_movement::ReferenceKind> for MovementReferenceKind {
    fn from(kind: domain::stock_movement::ReferenceKind) -> Self {
        use domain::stock_movement::ReferenceKind as K;
        match kind {
            K::Repair => Self::Repair,
            K::Purchase => Self::Purchase,
            K::Sale => Self::Sale,
            K::Adjustment => Self::Adjustment,
        }
    }
}

pub mod list {
    //! Definitions related to the [`SparePart`] list.

    use derive_more::From;
    use juniper::graphql_object;
    use service::read;

    use super::SparePart;
    use crate::{api, AsError, Context, Error};

    /// Page of the [`SparePart`] list.
    #[derive(Clone, Debug, From)]
    pub struct Page(read::spare_part::list::Page);

    /// Page of the `SparePart` catalogue, newest first.
    #[graphql_object(name = "SparePartPage", context = Context)]
    impl Page {
        /// `SparePart`s on this page.
        #[must_use]
        pub fn items(&self) -> Vec<SparePart> {
            self.0.items.iter().cloned().map(Into::into).collect()
        }

        /// Total count of the `SparePart`s matching the request.
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

        /// Maximum number of `SparePart`s on this page.
        #[must_use]
        pub fn limit(&self) -> i32 {
            api::int(self.0.arguments.limit())
        }
    }
}
