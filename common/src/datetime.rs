//! [`DateTimeOf`] definitions.
//!
//! All the values are kept in UTC with a microsecond precision, so day and
//! month boundaries are UTC ones and values survive a round trip through
//! Postgres `TIMESTAMPTZ` unchanged.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{cmp::Ordering, marker::PhantomData};

use derive_more::{Debug, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::well_known::Rfc3339, UtcOffset};

/// Moment not bound to any particular event.
pub type DateTime = DateTimeOf;

/// UTC moment of the event `Of`.
///
/// Moments of different events are different types, so a repair's completion
/// cannot be stored where its creation is expected without a [`coerce()`].
///
/// [`coerce()`]: DateTimeOf::coerce
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// UTC moment itself.
    utc: time::OffsetDateTime,

    /// Event of this moment.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Wraps the provided UTC moment, truncating it to microseconds.
    fn from_utc(utc: time::OffsetDateTime) -> Result<Self, ParseError> {
        utc.replace_nanosecond(utc.microsecond() * 1_000)
            .map(|utc| Self {
                utc,
                _of: PhantomData,
            })
            .map_err(ParseError::ComponentRange)
    }

    /// Returns the current moment.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        Self::from_utc(time::OffsetDateTime::now_utc())
            .expect("microseconds are always in range")
    }

    /// Parses an [RFC 3339] string, converting it into UTC.
    ///
    /// # Errors
    ///
    /// If the string is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        time::OffsetDateTime::parse(input, &Rfc3339)
            .map_err(ParseError::Parse)
            .and_then(|dt| Self::from_utc(dt.to_offset(UtcOffset::UTC)))
    }

    /// Formats this moment as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.utc
            .format(&Rfc3339)
            .expect("UTC years of `now()` always fit RFC 3339")
    }

    /// Returns the calendar date of this moment in `YYYYMMDD` format.
    #[must_use]
    pub fn date_stamp(&self) -> String {
        let date = self.utc.date();
        format!(
            "{:04}{:02}{:02}",
            date.year(),
            u8::from(date.month()),
            date.day(),
        )
    }

    /// Returns the midnight starting the day of this moment.
    #[must_use]
    pub fn start_of_day(&self) -> Self {
        Self {
            utc: self.utc.replace_time(time::Time::MIDNIGHT),
            _of: PhantomData,
        }
    }

    /// Returns the midnight starting the month of this moment.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn start_of_month(&self) -> Self {
        Self {
            utc: self
                .start_of_day()
                .utc
                .replace_day(1)
                .expect("first day exists in every month"),
            _of: PhantomData,
        }
    }

    /// Reinterprets this moment as the one of another event.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            utc: self.utc,
            _of: PhantomData,
        }
    }
}

/// Error of parsing a [`DateTime`].
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Not an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    Parse(time::error::Parse),

    /// Component out of its range.
    ComponentRange(time::error::ComponentRange),
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.utc == other.utc
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc.cmp(&other.utc)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        let dt = time::OffsetDateTime::from_sql(ty, raw)?;
        Self::from_utc(dt.to_offset(UtcOffset::UTC)).map_err(Box::from)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.utc.to_sql(ty, w)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! [`juniper`] integration.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Date and time in [RFC 3339] format with a microsecond precision.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[graphql_scalar(with = Self, parse_token(String))]
    type DateTime = crate::DateTime;

    impl DateTime {
        fn to_output<S: ScalarValue>(dt: &DateTime) -> Value<S> {
            Value::scalar(dt.to_rfc3339())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            let s = input.as_string_value().ok_or_else(|| {
                format!("Expected `DateTime` string, found: {input}")
            })?;
            Self::from_rfc3339(s)
                .map_err(|e| format!("Invalid `DateTime` string: {e}"))
        }
    }
}

#[cfg(test)]
mod spec {
    use super::DateTime;

    #[test]
    fn date_stamp() {
        let dt = DateTime::from_rfc3339("2024-01-05T23:59:59Z").unwrap();
        assert_eq!(dt.date_stamp(), "20240105");

        let dt = DateTime::from_rfc3339("2024-12-31T00:00:00+03:00").unwrap();
        assert_eq!(dt.date_stamp(), "20241230");
    }

    #[test]
    fn day_and_month_boundaries() {
        let dt = DateTime::from_rfc3339("2024-02-15T13:45:10.123Z").unwrap();

        assert_eq!(
            dt.start_of_day(),
            DateTime::from_rfc3339("2024-02-15T00:00:00Z").unwrap(),
        );
        assert_eq!(
            dt.start_of_month(),
            DateTime::from_rfc3339("2024-02-01T00:00:00Z").unwrap(),
        );
    }

    #[test]
    fn truncates_to_microseconds() {
        let precise =
            DateTime::from_rfc3339("2024-02-15T13:45:10.123456789Z").unwrap();

        assert_eq!(
            precise,
            DateTime::from_rfc3339("2024-02-15T13:45:10.123456Z").unwrap(),
        );
    }
}
