//! [`Purchase`]- and [`Sale`]-related definitions.

use derive_more::{AsRef, Display, From, Into};
use juniper::{GraphQLEnum, GraphQLScalar};
use service::domain;

use crate::api::scalar;

pub use self::{purchase::Purchase, sale::Sale};

/// Reference of a payment (transfer or check number).
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PaymentReference",
    with = scalar::Via::<domain::transaction::PaymentReference>,
)]
pub struct PaymentReference(domain::transaction::PaymentReference);

/// Notes about a `Purchase` or a `Sale`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "TransactionNotes",
    with = scalar::Via::<domain::transaction::Notes>,
)]
pub struct Notes(domain::transaction::Notes);

/// Method a `Purchase` or a `Sale` is paid with.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "PaymentMethod")]
pub enum PaymentMethod {
    /// Cash.
    Cash,

    /// Bank transfer.
    Transfer,

    /// Check.
    Check,

    /// Credit, allowed for `Sale`s only.
    Credit,
}

impl From<domain::transaction::PaymentMethod> for PaymentMethod {
    fn from(method: domain::transaction::PaymentMethod) -> Self {
        use domain::transaction::PaymentMethod as M;
        match method {
            M::Cash => Self::Cash,
            M::Transfer => Self::Transfer,
            M::Check => Self::Check,
            M::Credit => Self::Credit,
        }
    }
}

impl From<PaymentMethod> for domain::transaction::PaymentMethod {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::Transfer => Self::Transfer,
            PaymentMethod::Check => Self::Check,
            PaymentMethod::Credit => Self::Credit,
        }
    }
}

/// Status of a `Purchase` or a `Sale`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "TransactionStatus")]
pub enum Status {
    /// Recorded and in effect.
    Completed,

    /// Voided.
    Cancelled,
}

impl From<domain::transaction::Status> for Status {
    fn from(status: domain::transaction::Status) -> Self {
        use domain::transaction::Status as S;
        match status {
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

pub mod purchase {
    //! [`Purchase`]-related definitions.

    use common::{DateTime, Money};
    use derive_more::{Display, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{domain, query, Query as _};
    use uuid::Uuid;

    use super::{Notes, PaymentMethod, PaymentReference, Status};
    use crate::{api, AsError, Context, Error};

    /// The showroom buying a `Vehicle` from a `Customer`.
    #[derive(Clone, Debug, From)]
    pub struct Purchase(domain::transaction::Purchase);

    impl Purchase {
        /// Loads the [`Purchase`] with the provided ID.
        ///
        /// # Errors
        ///
        /// Errors if the [`Purchase`] doesn't exist.
        pub(crate) async fn load(
            id: domain::transaction::purchase::Id,
            ctx: &Context,
        ) -> Result<Self, Error> {
            ctx.service()
                .execute(query::purchase::ById::by(id))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())?
                .map(Self)
                .ok_or_else(|| api::NotExistsError::Purchase.into())
                .map_err(ctx.error())
        }
    }

    /// The showroom buying a `Vehicle` from a `Customer`.
    #[graphql_object(context = Context)]
    impl Purchase {
        /// Unique identifier of this `Purchase`.
        pub fn id(&self) -> Id {
            self.0.id.into()
        }

        /// Human-readable number of this `Purchase` (`PUR-20240115-001`).
        pub fn number(&self) -> String {
            self.0.number.to_string()
        }

        /// Invoice number of this `Purchase`.
        pub fn invoice_number(&self) -> String {
            self.0.invoice_number.to_string()
        }

        /// Bought `Vehicle`.
        #[tracing::instrument(
            skip_all,
            fields(
                gql.name = "Purchase.vehicle",
                otel.name = api::Query::SPAN_NAME,
            ),
        )]
        pub async fn vehicle(
            &self,
            ctx: &Context,
        ) -> Result<api::Vehicle, Error> {
            api::Vehicle::load(self.0.vehicle_id, ctx).await
        }

        /// `Customer` selling the `Vehicle`.
        #[tracing::instrument(
            skip_all,
            fields(
                gql.name = "Purchase.customer",
                otel.name = api::Query::SPAN_NAME,
            ),
        )]
        pub async fn customer(
            &self,
            ctx: &Context,
        ) -> Result<api::Customer, Error> {
            api::Customer::load(self.0.customer_id, ctx).await
        }

        /// Price the `Vehicle` is bought for.
        pub fn vehicle_price(&self) -> Money {
            self.0.vehicle_price
        }

        /// Tax paid on top of the price.
        pub fn tax_amount(&self) -> Money {
            self.0.tax_amount
        }

        /// Price plus tax.
        pub fn total_amount(&self) -> Money {
            self.0.total_amount
        }

        /// Method this `Purchase` is paid with.
        pub fn payment_method(&self) -> PaymentMethod {
            self.0.payment_method.into()
        }

        /// Reference of the payment.
        pub fn payment_reference(&self) -> Option<PaymentReference> {
            self.0.payment_reference.clone().map(Into::into)
        }

        /// `User` who processed this `Purchase`.
        #[tracing::instrument(
            skip_all,
            fields(
                gql.name = "Purchase.cashier",
                otel.name = api::Query::SPAN_NAME,
            ),
        )]
        pub async fn cashier(&self, ctx: &Context) -> Result<api::User, Error> {
            api::User::load(self.0.cashier_id, ctx).await
        }

        /// Status of this `Purchase`.
        pub fn status(&self) -> Status {
            self.0.status.into()
        }

        /// Notes about this `Purchase`.
        pub fn notes(&self) -> Option<Notes> {
            self.0.notes.clone().map(Into::into)
        }

        /// `DateTime` when this `Purchase` happened.
        pub fn transacted_at(&self) -> DateTime {
            self.0.transacted_at.coerce()
        }
    }

    /// Unique identifier of a `Purchase`.
    #[derive(
        Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
    )]
    #[from(domain::transaction::purchase::Id)]
    #[into(domain::transaction::purchase::Id)]
    #[graphql(name = "PurchaseId", transparent)]
    pub struct Id(Uuid);

    pub mod list {
        //! Definitions related to the [`Purchase`] list.

        use derive_more::From;
        use juniper::graphql_object;
        use service::read;

        use super::Purchase;
        use crate::{api, AsError, Context, Error};

        /// Page of the [`Purchase`] list.
        #[derive(Clone, Debug, From)]
        pub struct Page(read::transaction::purchase::list::Page);

        /// Page of the `Purchase` list, newest first.
        #[graphql_object(name = "PurchasePage", context = Context)]
        impl Page {
            /// `Purchase`s on this page.
            #[must_use]
            pub fn items(&self) -> Vec<Purchase> {
                self.0.items.iter().cloned().map(Into::into).collect()
            }

            /// Total count of the `Purchase`s matching the request.
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

            /// Maximum number of `Purchase`s on this page.
            #[must_use]
            pub fn limit(&self) -> i32 {
                api::int(self.0.arguments.limit())
            }
        }
    }
}

pub mod sale {
    //! [`Sale`]-related definitions.

    use common::{DateTime, Money};
    use derive_more::{Display, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{domain, query, Query as _};
    use uuid::Uuid;

    use super::{Notes, PaymentMethod, PaymentReference, Status};
    use crate::{api, AsError, Context, Error};

    /// The showroom selling a `Vehicle` to a `Customer`.
    #[derive(Clone, Debug, From)]
    pub struct Sale(domain::transaction::Sale);

    impl Sale {
        /// Loads the [`Sale`] with the provided ID.
        ///
        /// # Errors
        ///
        /// Errors if the [`Sale`] doesn't exist.
        pub(crate) async fn load(
            id: domain::transaction::sale::Id,
            ctx: &Context,
        ) -> Result<Self, Error> {
            ctx.service()
                .execute(query::sale::ById::by(id))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())?
                .map(Self)
                .ok_or_else(|| api::NotExistsError::Sale.into())
                .map_err(ctx.error())
        }
    }

    /// The showroom selling a `Vehicle` to a `Customer`.
    #[graphql_object(context = Context)]
    impl Sale {
        /// Unique identifier of this `Sale`.
        pub fn id(&self) -> Id {
            self.0.id.into()
        }

        /// Human-readable number of this `Sale` (`SAL-20240115-001`).
        pub fn number(&self) -> String {
            self.0.number.to_string()
        }

        /// Invoice number of this `Sale`.
        pub fn invoice_number(&self) -> String {
            self.0.invoice_number.to_string()
        }

        /// Sold `Vehicle`.
        #[tracing::instrument(
            skip_all,
            fields(
                gql.name = "Sale.vehicle",
                otel.name = api::Query::SPAN_NAME,
            ),
        )]
        pub async fn vehicle(
            &self,
            ctx: &Context,
        ) -> Result<api::Vehicle, Error> {
            api::Vehicle::load(self.0.vehicle_id, ctx).await
        }

        /// `Customer` buying the `Vehicle`.
        #[tracing::instrument(
            skip_all,
            fields(
                gql.name = "Sale.customer",
                otel.name = api::Query::SPAN_NAME,
            ),
        )]
        pub async fn customer(
            &self,
            ctx: &Context,
        ) -> Result<api::Customer, Error> {
            api::Customer::load(self.0.customer_id, ctx).await
        }

        /// Price the `Vehicle` is sold for.
        pub fn vehicle_price(&self) -> Money {
            self.0.vehicle_price
        }

        /// Tax charged on top of the price.
        pub fn tax_amount(&self) -> Money {
            self.0.tax_amount
        }

        /// Discount granted to the `Customer`.
        pub fn discount_amount(&self) -> Money {
            self.0.discount_amount
        }

        /// Price plus tax minus discount.
        pub fn total_amount(&self) -> Money {
            self.0.total_amount
        }

        /// Method this `Sale` is paid with.
        pub fn payment_method(&self) -> PaymentMethod {
            self.0.payment_method.into()
        }

        /// Reference of the payment.
        pub fn payment_reference(&self) -> Option<PaymentReference> {
            self.0.payment_reference.clone().map(Into::into)
        }

        /// `User` who processed this `Sale`.
        #[tracing::instrument(
            skip_all,
            fields(
                gql.name = "Sale.cashier",
                otel.name = api::Query::SPAN_NAME,
            ),
        )]
        pub async fn cashier(&self, ctx: &Context) -> Result<api::User, Error> {
            api::User::load(self.0.cashier_id, ctx).await
        }

        /// Status of this `Sale`.
        pub fn status(&self) -> Status {
            self.0.status.into()
        }

        /// Notes about this `Sale`.
        pub fn notes(&self) -> Option<Notes> {
            self.0.notes.clone().map(Into::into)
        }

        /// `DateTime` when this `Sale` happened.
        pub fn transacted_at(&self) -> DateTime {
            self.0.transacted_at.coerce()
        }
    }

    /// Unique identifier of a `Sale`.
    #[derive(
        Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
    )]
    #[from(domain::transaction::sale::Id)]
    #[into(domain::transaction::sale::Id)]
    #[graphql(name = "SaleId", transparent)]
    pub struct Id(Uuid);

    pub mod list {
        //! Definitions related to the [`Sale`] list.

        use derive_more::From;
        use juniper::graphql_object;
        use service::read;

        use super::Sale;
        use crate::{api, AsError, Context, Error};

        /// Page of the [`Sale`] list.
        #[derive(Clone, Debug, From)]
        pub struct Page(read::transaction::sale::list::Page);

        /// Page of the `Sale` list, newest first.
        #[graphql_object(name = "SalePage", context = Context)]
        impl Page {
            /// `Sale`s on this page.
            #[must_use]
            pub fn items(&self) -> Vec<Sale> {
                self.0.items.iter().cloned().map(Into::into).collect()
            }

            /// Total count of the `Sale`s matching the request.
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

            /// Maximum number of `Sale`s on this page.
            #[must_use]
            pub fn limit(&self) -> i32 {
                api::int(self.0.arguments.limit())
            }
        }
    }
}
