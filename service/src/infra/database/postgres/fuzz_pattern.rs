//! [`FuzzPattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

/// SQL `ILIKE` pattern matching the input anywhere inside a column.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Creates a new [`FuzzPattern`] out of the given `input`, escaping the
    /// `ILIKE` wildcards in it.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(format!(
            "%{}%",
            input
                .trim()
                .replace('\\', r"\\")
                .replace('%', r"\%")
                .replace('_', r"\_"),
        ))
    }
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn escapes_wildcards() {
        assert_eq!(FuzzPattern::new(" avanza ").to_string(), "%avanza%");
        assert_eq!(FuzzPattern::new("10%_off").to_string(), r"%10\%\_off%");
        assert_eq!(FuzzPattern::new(r"a\b").to_string(), r"%a\\b%");
    }
}
