//! GraphQL [`Query`]s definitions.

use common::DateTime;
use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Vehicle` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VEHICLE_NOT_EXISTS` - the `Vehicle` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "vehicle",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn vehicle(
        id: api::vehicle::Id,
        ctx: &Context,
    ) -> Result<api::Vehicle, Error> {
        api::Vehicle::load(id.into(), ctx).await
    }

    /// Returns the `Vehicle` with the specified chassis number.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VEHICLE_NOT_EXISTS` - no `Vehicle` has the specified chassis
    ///                          number.
    #[tracing::instrument(
        skip_all,
        fields(
            chassis_number = %chassis_number,
            gql.name = "vehicleByChassisNumber",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn vehicle_by_chassis_number(
        chassis_number: api::vehicle::ChassisNumber,
        ctx: &Context,
    ) -> Result<api::Vehicle, Error> {
        ctx.service()
            .execute(query::vehicle::ByChassisNumber::by(
                chassis_number.into(),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .map(Into::into)
            .ok_or_else(|| api::NotExistsError::Vehicle.into())
            .map_err(ctx.error())
    }

    /// Fetches a page of `Vehicle`s, newest first.
    ///
    /// Invalid `page` falls back to the first one, and invalid `limit` falls
    /// back to 10 (at most 100 is allowed).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "vehicles",
            limit = ?limit,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            search = ?search.as_ref().map(ToString::to_string),
            status = ?status,
        ),
    )]
    pub async fn vehicles(
        page: Option<i32>,
        limit: Option<i32>,
        search: Option<api::scalar::Search>,
        status: Option<api::vehicle::Status>,
        ctx: &Context,
    ) -> Result<api::vehicle::list::Page, Error> {
        ctx.service()
            .execute(query::vehicles::List::by(
                read::vehicle::list::Selector {
                    arguments: read::vehicle::list::Arguments::new(
                        page, limit,
                    ),
                    filter: read::vehicle::list::Filter {
                        search: search.map(Into::into),
                        status: status.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Repair` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REPAIR_NOT_EXISTS` - the `Repair` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "repair",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn repair(
        id: api::repair::Id,
        ctx: &Context,
    ) -> Result<api::Repair, Error> {
        api::Repair::load(id.into(), ctx).await
    }

    /// Fetches a page of `Repair`s, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "repairs",
            limit = ?limit,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            search = ?search.as_ref().map(ToString::to_string),
            status = ?status,
            vehicle_id = ?vehicle_id.map(|id| id.to_string()),
        ),
    )]
    pub async fn repairs(
        page: Option<i32>,
        limit: Option<i32>,
        search: Option<api::scalar::Search>,
        status: Option<api::repair::Status>,
        vehicle_id: Option<api::vehicle::Id>,
        ctx: &Context,
    ) -> Result<api::repair::list::Page, Error> {
        ctx.service()
            .execute(query::repairs::List::by(read::repair::list::Selector {
                arguments: read::repair::list::Arguments::new(page, limit),
                filter: read::repair::list::Filter {
                    search: search.map(Into::into),
                    status: status.map(Into::into),
                    vehicle_id: vehicle_id.map(Into::into),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `SparePart` with the specified ID, even a deleted one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SPARE_PART_NOT_EXISTS` - the `SparePart` with the specified ID does
    ///                             not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "sparePart",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn spare_part(
        id: api::spare_part::Id,
        ctx: &Context,
    ) -> Result<api::SparePart, Error> {
        api::SparePart::load(id.into(), ctx).await
    }

    /// Fetches a page of the `SparePart` catalogue, newest first.
    ///
    /// Deleted `SparePart`s are listed only if `includeInactive` is `true`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "spareParts",
            include_inactive = ?include_inactive,
            limit = ?limit,
            low_stock_only = ?low_stock_only,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            search = ?search.as_ref().map(ToString::to_string),
        ),
    )]
    pub async fn spare_parts(
        page: Option<i32>,
        limit: Option<i32>,
        search: Option<api::scalar::Search>,
        low_stock_only: Option<bool>,
        include_inactive: Option<bool>,
        ctx: &Context,
    ) -> Result<api::spare_part::list::Page, Error> {
        ctx.service()
            .execute(query::spare_parts::List::by(
                read::spare_part::list::Selector {
                    arguments: read::spare_part::list::Arguments::new(
                        page, limit,
                    ),
                    filter: read::spare_part::list::Filter {
                        search: search.map(Into::into),
                        low_stock_only: low_stock_only.unwrap_or_default(),
                        include_inactive: include_inactive.unwrap_or_default(),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns all the active `SparePart`s at or below their minimum stock
    /// level.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "lowStockSpareParts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn low_stock_spare_parts(
        ctx: &Context,
    ) -> Result<Vec<api::SparePart>, Error> {
        ctx.service()
            .execute(query::spare_parts::LowStock::by(
                read::spare_part::LowStock,
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|parts| parts.into_iter().map(Into::into).collect())
    }

    /// Returns the `Customer` with the specified ID, even a deleted one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "customer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        id: api::customer::Id,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        api::Customer::load(id.into(), ctx).await
    }

    /// Fetches a page of the active `Customer`s, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "customers",
            kind = ?kind,
            limit = ?limit,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            search = ?search.as_ref().map(ToString::to_string),
        ),
    )]
    pub async fn customers(
        page: Option<i32>,
        limit: Option<i32>,
        search: Option<api::scalar::Search>,
        kind: Option<api::customer::Kind>,
        ctx: &Context,
    ) -> Result<api::customer::list::Page, Error> {
        ctx.service()
            .execute(query::customers::List::by(
                read::customer::list::Selector {
                    arguments: read::customer::list::Arguments::new(
                        page, limit,
                    ),
                    filter: read::customer::list::Filter {
                        search: search.map(Into::into),
                        kind: kind.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Purchase` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PURCHASE_NOT_EXISTS` - the `Purchase` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "purchase",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn purchase(
        id: api::transaction::purchase::Id,
        ctx: &Context,
    ) -> Result<api::Purchase, Error> {
        api::Purchase::load(id.into(), ctx).await
    }

    /// Fetches a page of `Purchase`s, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = ?customer_id.map(|id| id.to_string()),
            gql.name = "purchases",
            limit = ?limit,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            vehicle_id = ?vehicle_id.map(|id| id.to_string()),
        ),
    )]
    pub async fn purchases(
        page: Option<i32>,
        limit: Option<i32>,
        vehicle_id: Option<api::vehicle::Id>,
        customer_id: Option<api::customer::Id>,
        ctx: &Context,
    ) -> Result<api::transaction::purchase::list::Page, Error> {
        ctx.service()
            .execute(query::purchases::List::by(
                read::transaction::purchase::list::Selector {
                    arguments: read::transaction::purchase::list::Arguments::new(
                        page, limit,
                    ),
                    filter: read::transaction::Filter {
                        vehicle_id: vehicle_id.map(Into::into),
                        customer_id: customer_id.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Sale` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SALE_NOT_EXISTS` - the `Sale` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "sale",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn sale(
        id: api::transaction::sale::Id,
        ctx: &Context,
    ) -> Result<api::Sale, Error> {
        api::Sale::load(id.into(), ctx).await
    }

    /// Fetches a page of `Sale`s, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = ?customer_id.map(|id| id.to_string()),
            gql.name = "sales",
            limit = ?limit,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            vehicle_id = ?vehicle_id.map(|id| id.to_string()),
        ),
    )]
    pub async fn sales(
        page: Option<i32>,
        limit: Option<i32>,
        vehicle_id: Option<api::vehicle::Id>,
        customer_id: Option<api::customer::Id>,
        ctx: &Context,
    ) -> Result<api::transaction::sale::list::Page, Error> {
        ctx.service()
            .execute(query::sales::List::by(
                read::transaction::sale::list::Selector {
                    arguments: read::transaction::sale::list::Arguments::new(
                        page, limit,
                    ),
                    filter: read::transaction::Filter {
                        vehicle_id: vehicle_id.map(Into::into),
                        customer_id: customer_id.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `User` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "user",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn user(
        id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        api::User::load(id.into(), ctx).await
    }

    /// Returns the current `DashboardStats`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "dashboard",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn dashboard(ctx: &Context) -> Result<api::DashboardStats, Error> {
        ctx.service()
            .execute(query::dashboard::Stats::by(DateTime::now()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}
