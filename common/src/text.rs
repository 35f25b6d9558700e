//! Macros for defining text newtypes.

/// Macro for defining a trimmed, non-empty and length-limited [`String`]
/// newtype.
///
/// # Example
///
/// ```rust
/// use common::define_text;
///
/// define_text! {
///     #[doc = "Brand of a vehicle."]
///     struct Brand(max_len = 100);
/// }
///
/// assert!(Brand::new("Toyota").is_some());
/// assert!(Brand::new(" Toyota").is_none());
/// assert!(Brand::new("").is_none());
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        struct $name:ident(max_len = $max:literal);
    ) => {
        #[derive(Clone, Debug, Eq, Hash, PartialEq)]
        #[doc = $doc]
        pub struct $name(::std::string::String);

        impl $name {
            /// Maximum length of this value in bytes.
            pub const MAX_LEN: usize = $max;

            /// Creates a new value if the given `text` is valid.
            #[must_use]
            pub fn new(
                text: impl ::core::convert::Into<::std::string::String>,
            ) -> ::core::option::Option<Self> {
                let text = text.into();
                Self::check(&text).then_some(Self(text))
            }

            /// Checks whether the given `text` is valid.
            fn check(text: &str) -> bool {
                text.trim() == text
                    && !text.is_empty()
                    && text.len() <= Self::MAX_LEN
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::new(s).ok_or(::core::concat!(
                    "invalid `",
                    ::core::stringify!($name),
                    "`",
                ))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(
                &self,
                f: &mut ::core::fmt::Formatter<'_>,
            ) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        #[cfg(feature = "postgres")]
        impl<'a> $crate::private::postgres_types::FromSql<'a> for $name {
            fn from_sql(
                ty: &$crate::private::postgres_types::Type,
                raw: &'a [u8],
            ) -> ::core::result::Result<
                Self,
                ::std::boxed::Box<
                    dyn ::std::error::Error
                        + ::core::marker::Sync
                        + ::core::marker::Send,
                >,
            > {
                <::std::string::String as $crate::private::postgres_types::FromSql>
                    ::from_sql(ty, raw)
                    .map(Self)
            }

            fn accepts(ty: &$crate::private::postgres_types::Type) -> bool {
                <::std::string::String as $crate::private::postgres_types::FromSql>
                    ::accepts(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl $crate::private::postgres_types::ToSql for $name {
            $crate::private::postgres_types::to_sql_checked!();

            fn to_sql(
                &self,
                ty: &$crate::private::postgres_types::Type,
                w: &mut $crate::private::postgres_types::private::BytesMut,
            ) -> ::core::result::Result<
                $crate::private::postgres_types::IsNull,
                ::std::boxed::Box<
                    dyn ::std::error::Error
                        + ::core::marker::Sync
                        + ::core::marker::Send,
                >,
            > {
                <::std::string::String as $crate::private::postgres_types::ToSql>
                    ::to_sql(&self.0, ty, w)
            }

            fn accepts(ty: &$crate::private::postgres_types::Type) -> bool {
                <::std::string::String as $crate::private::postgres_types::ToSql>
                    ::accepts(ty)
            }
        }
    };
}

#[cfg(test)]
mod spec {
    crate::define_text! {
        #[doc = "Text used in tests."]
        struct Sample(max_len = 5);
    }

    #[test]
    fn accepts_trimmed_non_empty_text() {
        assert_eq!(Sample::new("abc").unwrap().as_ref(), "abc");
        assert_eq!(Sample::new("abcde").unwrap().to_string(), "abcde");
    }

    #[test]
    fn rejects_invalid_text() {
        assert!(Sample::new("").is_none());
        assert!(Sample::new(" abc").is_none());
        assert!(Sample::new("abc ").is_none());
        assert!(Sample::new("abcdef").is_none());
        assert_eq!("".parse::<Sample>(), Err("invalid `Sample`"));
    }
}
