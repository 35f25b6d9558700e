//! Human-readable [`Code`]s generated out of counters.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, hash::Hash, marker::PhantomData};

use common::DateTimeOf;
use derive_more::{Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};

/// Prefix of a [`Code`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Prefix {
    /// Vehicle codes.
    Vehicle,

    /// Customer codes.
    Customer,

    /// Spare part codes.
    SparePart,

    /// Repair numbers.
    Repair,

    /// Purchase transaction numbers.
    Purchase,

    /// Sale transaction numbers.
    Sale,

    /// Purchase invoice numbers.
    PurchaseInvoice,

    /// Sale invoice numbers.
    SaleInvoice,
}

impl Prefix {
    /// Returns the textual representation of this [`Prefix`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vehicle => "VEH",
            Self::Customer => "CUST",
            Self::SparePart => "PART",
            Self::Repair => "REP",
            Self::Purchase => "PUR",
            Self::Sale => "SAL",
            Self::PurchaseInvoice => "INV-PUR",
            Self::SaleInvoice => "INV-SAL",
        }
    }
}

/// Key of a counter: a [`Prefix`] and a scope the counter restarts in.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Key {
    /// [`Prefix`] of the generated [`Code`]s.
    prefix: Prefix,

    /// `YYYYMMDD` date the counter is scoped to, or empty for a global one.
    scope: String,
}

impl Key {
    /// Creates a [`Key`] of a counter never restarting (`VEH-001`).
    #[must_use]
    pub const fn global(prefix: Prefix) -> Self {
        Self {
            prefix,
            scope: String::new(),
        }
    }

    /// Creates a [`Key`] of a counter restarting every UTC day
    /// (`REP-20240115-001`).
    #[must_use]
    pub fn daily<Of: ?Sized>(prefix: Prefix, at: &DateTimeOf<Of>) -> Self {
        Self {
            prefix,
            scope: at.date_stamp(),
        }
    }

    /// Returns [`Prefix`] of this [`Key`].
    #[must_use]
    pub const fn prefix(&self) -> Prefix {
        self.prefix
    }

    /// Returns the scope of this [`Key`] (empty if it's a global one).
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Formats the [`Code`] for the provided counter [`Value`].
    #[must_use]
    pub fn code<Of: ?Sized>(&self, Value(n): Value) -> Code<Of> {
        let prefix = self.prefix.as_str();
        let code = if self.scope.is_empty() {
            format!("{prefix}-{n:03}")
        } else {
            format!("{prefix}-{}-{n:03}", self.scope)
        };
        Code::new(code)
    }
}

/// Value of a counter, starting from `1`.
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
pub struct Value(pub u32);

/// Human-readable code of `Of`.
pub struct Code<Of: ?Sized> {
    /// Textual representation of this [`Code`].
    inner: String,

    /// Type parameter describing what this [`Code`] identifies.
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> Code<Of> {
    /// Wraps the provided textual representation into a [`Code`].
    fn new(inner: String) -> Self {
        Self {
            inner,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> AsRef<str> for Code<Of> {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl<Of: ?Sized> Clone for Code<Of> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<Of: ?Sized> fmt::Debug for Code<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<Of: ?Sized> fmt::Display for Code<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl<Of: ?Sized> Eq for Code<Of> {}
impl<Of: ?Sized> PartialEq for Code<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Hash for Code<Of> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

#[cfg(feature = "postgres")]
impl<'a, Of: ?Sized> FromSql<'a> for Code<Of> {
    accepts!(VARCHAR, TEXT);

    fn from_sql(
        ty: &Type,
        raw: &'a [u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        String::from_sql(ty, raw).map(Self::new)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for Code<Of> {
    accepts!(VARCHAR, TEXT);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.inner.to_sql(ty, w)
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use super::{Code, Key, Prefix, Value};

    #[test]
    fn formats_global_codes() {
        let key = Key::global(Prefix::Vehicle);
        assert_eq!(key.code::<()>(Value(1)).to_string(), "VEH-001");
        assert_eq!(key.code::<()>(Value(42)).to_string(), "VEH-042");
        assert_eq!(key.code::<()>(Value(1234)).to_string(), "VEH-1234");
    }

    #[test]
    fn formats_daily_codes() {
        let at = DateTime::from_rfc3339("2024-01-15T10:00:00Z").unwrap();

        let key = Key::daily(Prefix::Repair, &at);
        assert_eq!(key.code::<()>(Value(1)).to_string(), "REP-20240115-001");

        let key = Key::daily(Prefix::SaleInvoice, &at);
        let code: Code<()> = key.code(Value(7));
        assert_eq!(code.as_ref(), "INV-SAL-20240115-007");
    }

    #[test]
    fn daily_keys_differ_by_day() {
        let monday = DateTime::from_rfc3339("2024-01-15T23:59:59Z").unwrap();
        let tuesday = DateTime::from_rfc3339("2024-01-16T00:00:00Z").unwrap();

        assert_ne!(
            Key::daily(Prefix::Sale, &monday),
            Key::daily(Prefix::Sale, &tuesday),
        );
        assert_eq!(
            Key::daily(Prefix::Sale, &monday),
            Key::daily(Prefix::Sale, &monday.start_of_day()),
        );
        assert_ne!(
            Key::daily(Prefix::Sale, &monday),
            Key::daily(Prefix::Purchase, &monday),
        );
    }
}
