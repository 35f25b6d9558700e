//! [`User`] definitions.

use common::{define_kind, define_text};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff member of the dealership.
///
/// [`User`]s are only read: they decorate the mechanics and cashiers
/// referenced by other entities.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Username`] of this [`User`].
    pub username: Username,

    /// [`FullName`] of this [`User`].
    pub full_name: FullName,

    /// [`Role`] of this [`User`].
    pub role: Role,

    /// Indicator whether this [`User`] wasn't deactivated.
    pub is_active: bool,
}

/// ID of a [`User`].
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
    #[doc = "Username of a [`User`]."]
    struct Username(max_len = 50);
}

define_text! {
    #[doc = "Full name of a [`User`]."]
    struct FullName(max_len = 100);
}

define_kind! {
    #[doc = "Role of a [`User`]."]
    enum Role {
        #[doc = "Administrator approving prices."]
        Admin = 1,

        #[doc = "Mechanic performing repairs."]
        Mechanic = 2,

        #[doc = "Cashier processing transactions."]
        Cashier = 3,
    }
}
