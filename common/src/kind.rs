//! Macros for defining kind enums.

/// Macro for defining a kind enum backed by a string representation.
///
/// The string representation is used for [`Display`], [`FromStr`], Serde
/// (de)serialization and the database column (`VARCHAR`/`TEXT`).
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
///
/// define_kind! {
///     #[doc = "Shape kind."]
///     enum Kind {
///         #[doc = "A cube"]
///         Cube = "cube",
///
///         #[doc = "A sphere"]
///         Sphere = "sphere",
///     }
/// }
///
/// assert_eq!(Kind::Cube.to_string(), "cube");
/// assert_eq!("sphere".parse::<Kind>().unwrap(), Kind::Sphere);
/// ```
///
/// [`Display`]: std::fmt::Display
/// [`FromStr`]: std::str::FromStr
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:literal
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
        )]
        #[doc = $doc]
        pub enum $name {
            $(
                #[doc = $variant_doc]
                #[strum(serialize = $value)]
                $variant,
            )*
        }

        impl $name {
            /// All the variants, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Returns the string representation of this value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(
                        Self::$variant => $value,
                    )*
                }
            }
        }

        impl $crate::private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::private::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: $crate::private::serde::Deserializer<'de>,
            {
                use $crate::private::serde::de::Error as _;

                let s = <::std::string::String as
                    $crate::private::serde::Deserialize>
                    ::deserialize(deserializer)?;
                s.parse().map_err(|_| {
                    D::Error::unknown_variant(&s, &[$($value),*])
                })
            }
        }

        #[cfg(feature = "postgres")]
        impl<'a> $crate::private::postgres_types::FromSql<'a> for $name {
            $crate::private::postgres_types::accepts!(VARCHAR, TEXT);

            fn from_sql(
                ty: &$crate::private::postgres_types::Type,
                raw: &'a [u8],
            ) -> Result<
                $name,
                Box<dyn ::std::error::Error
                    + ::core::marker::Sync
                    + ::core::marker::Send>,
            > {
                let s = <&str as $crate::private::postgres_types::FromSql>
                    ::from_sql(ty, raw)?;
                s.parse().map_err(|_| ::std::format!(
                    "invalid `{}` value: {s}",
                    ::core::stringify!($name),
                ).into())
            }
        }

        #[cfg(feature = "postgres")]
        impl $crate::private::postgres_types::ToSql for $name {
            $crate::private::postgres_types::accepts!(VARCHAR, TEXT);
            $crate::private::postgres_types::to_sql_checked!();

            fn to_sql(
                &self,
                ty: &$crate::private::postgres_types::Type,
                w: &mut $crate::private::postgres_types::private::BytesMut,
            ) -> Result<
                $crate::private::postgres_types::IsNull,
                ::std::boxed::Box<
                    dyn ::std::error::Error
                        + ::core::marker::Sync
                        + ::core::marker::Send
                >,
            > {
                self.as_str().to_sql(ty, w)
            }
        }
    };
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    crate::define_kind! {
        #[doc = "Testing kind."]
        enum Shape {
            #[doc = "A cube."]
            Cube = "cube",

            #[doc = "A long box."]
            LongBox = "long_box",
        }
    }

    #[test]
    fn uses_string_representation() {
        assert_eq!(Shape::LongBox.to_string(), "long_box");
        assert_eq!(Shape::Cube.as_str(), "cube");
        assert_eq!(Shape::from_str("long_box").unwrap(), Shape::LongBox);
        assert!(Shape::from_str("LongBox").is_err());
        assert!(Shape::from_str("").is_err());
    }

    #[test]
    fn serializes_as_string() {
        assert_eq!(
            serde_json::to_string(&Shape::LongBox).unwrap(),
            r#""long_box""#,
        );
        assert_eq!(
            serde_json::from_str::<Shape>(r#""cube""#).unwrap(),
            Shape::Cube,
        );
    }

    #[test]
    fn lists_all_variants() {
        assert_eq!(Shape::ALL, &[Shape::Cube, Shape::LongBox]);
    }
}
