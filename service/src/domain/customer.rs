//! [`Customer`] definitions.

use std::{str::FromStr, sync::LazyLock};

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, define_text, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::sequence;

/// Person or company the dealership buys vehicles from or sells them to.
#[derive(Clone, Debug)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: Id,

    /// Human-readable [`Code`] of this [`Customer`].
    pub code: Code,

    /// [`Name`] of this [`Customer`].
    pub name: Name,

    /// [`Phone`] of this [`Customer`].
    pub phone: Option<Phone>,

    /// [`Email`] of this [`Customer`].
    pub email: Option<Email>,

    /// [`Address`] of this [`Customer`].
    pub address: Option<Address>,

    /// [`IdCardNumber`] of this [`Customer`].
    pub id_card_number: Option<IdCardNumber>,

    /// [`Kind`] of this [`Customer`].
    pub kind: Kind,

    /// [`DateTime`] when this [`Customer`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Customer`] was modified the last time.
    pub updated_at: ModificationDateTime,

    /// Indicator whether this [`Customer`] wasn't deleted.
    pub is_active: bool,
}

impl Customer {
    /// Bumps [`Customer::updated_at`].
    pub(crate) fn touch(&mut self) {
        self.updated_at = ModificationDateTime::now();
    }
}

/// ID of a [`Customer`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    derive_more::FromStr,
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

/// Human-readable code of a [`Customer`] (`CUST-001`).
pub type Code = sequence::Code<Customer>;

define_text! {
    #[doc = "Name of a [`Customer`]."]
    struct Name(max_len = 255);
}

define_text! {
    #[doc = "Postal address of a [`Customer`]."]
    struct Address(max_len = 1024);
}

define_text! {
    #[doc = "Number of an identity card of a [`Customer`]."]
    struct IdCardNumber(max_len = 50);
}

define_kind! {
    #[doc = "Kind of a [`Customer`]."]
    enum Kind {
        #[doc = "Private person."]
        Individual = 1,

        #[doc = "Legal entity."]
        Corporate = 2,
    }
}

/// Email address of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]{1,64}@[^\s@.]+(\.[^\s@.]+)+$")
                .expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 255 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Phone number of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format: optional `+`, then
        /// digits optionally grouped by single spaces or dashes.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?\d([-\s]?\d){5,18}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// [`DateTime`] when a [`Customer`] was created.
pub type CreationDateTime = DateTimeOf<(Customer, unit::Creation)>;

/// [`DateTime`] when a [`Customer`] was modified the last time.
pub type ModificationDateTime = DateTimeOf<(Customer, unit::Modification)>;

#[cfg(test)]
mod spec {
    use super::{Email, Phone};

    #[test]
    fn email() {
        assert!(Email::new("budi@example.com").is_some());
        assert!(Email::new("a.b+c@mail.example.co.id").is_some());

        assert!(Email::new("").is_none());
        assert!(Email::new("budi").is_none());
        assert!(Email::new("budi@example").is_none());
        assert!(Email::new("budi @example.com").is_none());
    }

    #[test]
    fn phone() {
        assert!(Phone::new("081234567890").is_some());
        assert!(Phone::new("+62 812-3456-7890").is_some());

        assert!(Phone::new("12345").is_none());
        assert!(Phone::new("0812 abc 7890").is_none());
        assert!(Phone::new("0812--3456").is_none());
    }
}
