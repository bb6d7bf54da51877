//! Domain definitions.

/// Defines a validated text newtype backed by a [`String`].
///
/// The text must not be empty, must not start or end with whitespace and
/// must not exceed the provided number of characters.
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        $name:ident(max = $max:literal)
    ) => {
        #[doc = $doc]
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
            ::serde::Deserialize,
            ::serde::Serialize,
        )]
        #[as_ref(str, String)]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::FromSql, ::postgres_types::ToSql),
            postgres(transparent)
        )]
        #[serde(into = "String", try_from = "String")]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new [`", stringify!($name), "`].")]
            ///
            /// # Safety
            ///
            /// The caller must ensure that the given `text` matches the format.
            #[expect(unsafe_code, reason = "bypass")]
            #[must_use]
            pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
                Self(text.into())
            }

            #[doc = concat!(
                "Creates a new [`", stringify!($name),
                "`] if the given `text` is valid."
            )]
            #[must_use]
            pub fn new(text: impl Into<String>) -> Option<Self> {
                let text = text.into();
                Self::check(&text).then_some(Self(text))
            }

            #[doc = concat!(
                "Checks whether the given `text` is a valid [`",
                stringify!($name), "`]."
            )]
            fn check(text: impl AsRef<str>) -> bool {
                let text = text.as_ref();
                text.trim() == text
                    && !text.is_empty()
                    && text.chars().count() <= $max
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }

        impl TryFrom<String> for $name {
            type Error = &'static str;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }

        impl From<$name> for String {
            fn from(text: $name) -> Self {
                text.0
            }
        }
    };
}

pub mod inquiry;
pub mod property;
pub mod tag;
pub mod user;

pub use self::{
    inquiry::Inquiry, property::Property, tag::Tag, user::User,
};
