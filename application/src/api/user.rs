//! [`User`]-related definitions.

use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A staff member of the showroom.
#[derive(Clone, Debug, From)]
pub struct User(domain::User);

impl User {
    /// Loads the [`User`] with the provided ID.
    ///
    /// # Errors
    ///
    /// Errors if the [`User`] doesn't exist.
    pub(crate) async fn load(
        id: domain::user::Id,
        ctx: &Context,
    ) -> Result<Self, Error> {
        ctx.service()
            .execute(query::user::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .map(Self)
            .ok_or_else(|| api::NotExistsError::User.into())
            .map_err(ctx.error())
    }
}

/// A staff member of the showroom.
#[graphql_object(context = Context)]
impl User {
    /// Unique identifier of this `User`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Login name of this `User`.
    pub fn username(&self) -> Username {
        self.0.username.clone().into()
    }

    /// Full name of this `User`.
    pub fn full_name(&self) -> FullName {
        self.0.full_name.clone().into()
    }

    /// Role of this `User`.
    pub fn role(&self) -> Role {
        self.0.role.into()
    }

    /// Indicator whether this `User` is still active.
    pub fn is_active(&self) -> bool {
        self.0.is_active
    }
}

/// Unique identifier of a `User`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::user::Id)]
#[into(domain::user::Id)]
#[graphql(name = "UserId", transparent)]
pub struct Id(Uuid);

/// Login name of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "UserUsername",
    with = scalar::Via::<domain::user::Username>,
)]
pub struct Username(domain::user::Username);

/// Full name of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "UserFullName",
    with = scalar::Via::<domain::user::FullName>,
)]
pub struct FullName(domain::user::FullName);

/// Role of a `User`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "UserRole")]
pub enum Role {
    /// Administrator approving selling prices.
    Admin,

    /// Mechanic performing repairs.
    Mechanic,

    /// Cashier recording purchases and sales.
    Cashier,
}

impl From<domain::user::Role> for Role {
    fn from(role: domain::user::Role) -> Self {
        use domain::user::Role as R;
        match role {
            R::Admin => Self::Admin,
            R::Mechanic => Self::Mechanic,
            R::Cashier => Self::Cashier,
        }
    }
}
