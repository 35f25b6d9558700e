//! [`Customer`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A person or a company the showroom buys vehicles from or sells them to.
#[derive(Clone, Debug, From)]
pub struct Customer(domain::Customer);

impl Customer {
    /// Loads the [`Customer`] with the provided ID, even a deleted one.
    ///
    /// # Errors
    ///
    /// Errors if the [`Customer`] doesn't exist.
    pub(crate) async fn load(
        id: domain::customer::Id,
        ctx: &Context,
    ) -> Result<Self, Error> {
        ctx.service()
            .execute(query::customer::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .map(Self)
            .ok_or_else(|| api::NotExistsError::Customer.into())
            .map_err(ctx.error())
    }
}

/// A person or a company the showroom buys vehicles from or sells them to.
#[graphql_object(context = Context)]
impl Customer {
    /// Unique identifier of this `Customer`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Human-readable code of this `Customer` (`CUST-001`).
    pub fn code(&self) -> String {
        self.0.code.to_string()
    }

    /// Name of this `Customer`.
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Phone number of this `Customer`.
    pub fn phone(&self) -> Option<Phone> {
        self.0.phone.clone().map(Into::into)
    }

    /// Email of this `Customer`.
    pub fn email(&self) -> Option<Email> {
        self.0.email.clone().map(Into::into)
    }

    /// Postal address of this `Customer`.
    pub fn address(&self) -> Option<Address> {
        self.0.address.clone().map(Into::into)
    }

    /// Identity card number of this `Customer`.
    pub fn id_card_number(&self) -> Option<IdCardNumber> {
        self.0.id_card_number.clone().map(Into::into)
    }

    /// Kind of this `Customer`.
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// Indicator whether this `Customer` is not deleted.
    pub fn is_active(&self) -> bool {
        self.0.is_active
    }

    /// `DateTime` when this `Customer` was registered.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Customer` was modified last time.
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// Unique identifier of a `Customer`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::customer::Id)]
#[into(domain::customer::Id)]
#[graphql(name = "CustomerId", transparent)]
pub struct Id(Uuid);

/// Name of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerName",
    with = scalar::Via::<domain::customer::Name>,
)]
pub struct Name(domain::customer::Name);

/// Phone number of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerPhone",
    with = scalar::Via::<domain::customer::Phone>,
)]
pub struct Phone(domain::customer::Phone);

/// Email of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerEmail",
    with = scalar::Via::<domain::customer::Email>,
)]
pub struct Email(domain::customer::Email);

/// Postal address of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerAddress",
    with = scalar::Via::<domain::customer::Address>,
)]
pub struct Address(domain::customer::Address);

/// Identity card number of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerIdCardNumber",
    with = scalar::Via::<domain::customer::IdCardNumber>,
)]
pub struct IdCardNumber(domain::customer::IdCardNumber);

/// Kind of a `Customer`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "CustomerKind")]
pub enum Kind {
    /// Private person.
    Individual,

    /// Legal entity.
    Corporate,
}

impl From<domain::customer::Kind> for Kind {
    fn from(kind: domain::customer::Kind) -> Self {
        use domain::customer::Kind as K;
        match kind {
            K::Individual => Self::Individual,
            K::Corporate => Self::Corporate,
        }
    }
}

impl From<Kind> for domain::customer::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Individual => Self::Individual,
            Kind::Corporate => Self::Corporate,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Customer`] list.

    use derive_more::From;
    use juniper::graphql_object;
    use service::read;

    use super::Customer;
    use crate::{api, AsError, Context, Error};

    /// Page of the [`Customer`] list.
    #[derive(Clone, Debug, From)]
    pub struct Page(read::customer::list::Page);

    /// Page of the active `Customer`s, newest first.
    #[graphql_object(name = "CustomerPage", context = Context)]
    impl Page {
        /// `Customer`s on this page.
        #[must_use]
        pub fn items(&self) -> Vec<Customer> {
            self.0.items.iter().cloned().map(Into::into).collect()
        }

        /// Total count of the `Customer`s matching the request.
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

        /// Maximum number of `Customer`s on this page.
        #[must_use]
        pub fn limit(&self) -> i32 {
            api::int(self.0.arguments.limit())
        }
    }
}
