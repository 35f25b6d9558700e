//! [`Money`]-related definitions.

use std::{fmt, iter, ops, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Amount of money in the dealership's single accounting currency.
///
/// May be negative: differences between amounts (a large discount, a
/// profit) are [`Money`] as well.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(transparent)
)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest amount fitting a `NUMERIC(15, 2)` column:
    /// `9999999999999.99`.
    pub const MAX: Self =
        Self(Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2));

    /// Number of minor units digits an amount is accounted in.
    pub const SCALE: u32 = 2;

    /// Creates a new [`Money`] out of the provided amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the amount of this [`Money`].
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Indicates whether this [`Money`] is below zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Indicates whether this [`Money`] is accounted in whole minor units
    /// (cents), ignoring trailing zeros.
    #[must_use]
    pub fn is_in_minor_units(self) -> bool {
        self.0.normalize().scale() <= Self::SCALE
    }

    /// Indicates whether this [`Money`] fits between `-`[`Money::MAX`] and
    /// [`Money::MAX`].
    #[must_use]
    pub fn is_within_bounds(self) -> bool {
        self.0.abs() <= Self::MAX.0
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<u32> for Money {
    fn from(amount: u32) -> Self {
        Self(amount.into())
    }
}

impl ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl ops::Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl ops::Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, ops::Add::add)
    }
}

impl<'a> iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() != s {
            return Err("surrounding whitespace");
        }
        Decimal::from_str_exact(s)
            .map(Self)
            .map_err(|_| "invalid amount")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Decimal amount of money in `{major}.{minor}` format, where `minor` is
    /// optional, and `-` prefix is allowed for negative amounts.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Money;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(Money::from_str("123.45").unwrap().to_string(), "123.45");
        assert_eq!(Money::from_str("-5").unwrap().to_string(), "-5");
        assert!(Money::from_str("100000").is_ok());

        assert!(Money::from_str("").is_err());
        assert!(Money::from_str("12,5").is_err());
        assert!(Money::from_str(" 12").is_err());
        assert!(Money::from_str("123.45USD").is_err());
    }

    #[test]
    fn to_string_drops_trailing_zeros() {
        assert_eq!(money("123.00").to_string(), "123");
        assert_eq!(money("123.50").to_string(), "123.5");
        assert_eq!(money("0.00").to_string(), "0");
    }

    #[test]
    fn arithmetic() {
        assert_eq!(money("5000") * 2, money("10000"));
        assert_eq!(money("100000") + money("10000"), money("110000"));
        assert_eq!(money("100") - money("250"), money("-150"));
        assert_eq!(
            [money("1.5"), money("2.5"), money("6")].iter().sum::<Money>(),
            money("10"),
        );
        assert_eq!(Vec::<Money>::new().into_iter().sum::<Money>(), Money::ZERO);
    }

    #[test]
    fn bounds() {
        assert_eq!(Money::MAX, money("9999999999999.99"));
        assert!(Money::MAX.is_within_bounds());
        assert!((-Money::MAX).is_within_bounds());
        assert!(!money("10000000000000").is_within_bounds());
        assert!(!money("-10000000000000").is_within_bounds());

        assert!(money("12.34").is_in_minor_units());
        assert!(money("12.3400").is_in_minor_units());
        assert!(money("12").is_in_minor_units());
        assert!(!money("0.001").is_in_minor_units());
    }

    #[test]
    fn sign() {
        assert!(money("-0.01").is_negative());
        assert!(!money("0").is_negative());
        assert!(!money("-0").is_negative());
        assert!(!money("12").is_negative());
    }
}
