//! [`Price`]-related definitions.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
use rust_decimal::{prelude::ToPrimitive as _, Decimal};

/// Non-negative decimal amount of money.
///
/// Currency is implied by the deployment and is not carried by the value.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Price(Decimal);

impl Price {
    /// Zero [`Price`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Price`] out of the provided amount.
    ///
    /// [`None`] is returned if the amount is negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative() || amount.is_zero()).then_some(Self(amount))
    }

    /// Returns the amount of this [`Price`].
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<u32> for Price {
    fn from(amount: u32) -> Self {
        Self(amount.into())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.is_integer().then(|| self.0.to_i128()).flatten() {
            Some(int) => write!(f, "{int}"),
            None => write!(f, "{}", self.0.normalize()),
        }
    }
}

/// Error of parsing a [`Price`] from a string.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ParseError {
    /// String is not a decimal number.
    #[display("not a decimal number")]
    Invalid,

    /// Number is negative.
    #[display("negative amount")]
    Negative,
}

impl FromStr for Price {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let amount = Decimal::from_str_exact(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_err(|_| ParseError::Invalid)?;
        Self::new(amount).ok_or(ParseError::Negative)
    }
}

mod serde {
    //! Module providing integration with [`serde`] crate.
    //!
    //! [`Price`] is serialized as a decimal string and may be deserialized
    //! either from a string or from a JSON number.

    use std::fmt;

    use rust_decimal::Decimal;
    use serde::{
        de::{self, Visitor},
        Deserialize, Deserializer, Serialize, Serializer,
    };

    use super::Price;

    impl Serialize for Price {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Price {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(PriceVisitor)
        }
    }

    /// [`Visitor`] of a [`Price`].
    struct PriceVisitor;

    impl PriceVisitor {
        fn checked<E: de::Error>(amount: Decimal) -> Result<Price, E> {
            Price::new(amount).ok_or_else(|| E::custom("negative price"))
        }
    }

    impl Visitor<'_> for PriceVisitor {
        type Value = Price;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative decimal number or string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
            Self::checked(v.into())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
            Self::checked(v.into())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
            Self::checked(
                Decimal::try_from(v).map_err(|_| E::custom("invalid price"))?,
            )
        }
    }
}

#[cfg(feature = "postgres")]
mod postgres {
    //! Module providing integration with [`postgres_types`] crate.

    use std::error::Error as StdError;

    use postgres_types::{
        accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql,
        Type,
    };
    use rust_decimal::Decimal;

    use super::Price;

    impl FromSql<'_> for Price {
        accepts!(NUMERIC);

        fn from_sql(
            ty: &Type,
            raw: &[u8],
        ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
            Self::new(Decimal::from_sql(ty, raw)?)
                .ok_or_else(|| "negative price".into())
        }
    }

    impl ToSql for Price {
        accepts!(NUMERIC);
        to_sql_checked!();

        fn to_sql(
            &self,
            ty: &Type,
            w: &mut BytesMut,
        ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
            self.0.to_sql(ty, w)
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{ParseError, Price};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Price::from_str("123.45").unwrap(),
            Price::new(decimal("123.45")).unwrap(),
        );
        assert_eq!(Price::from_str(" 50000 ").unwrap(), Price::from(50_000));
        assert_eq!(Price::from_str("0").unwrap(), Price::ZERO);

        assert_eq!(Price::from_str("abc"), Err(ParseError::Invalid));
        assert_eq!(Price::from_str(""), Err(ParseError::Invalid));
        assert_eq!(Price::from_str("12abc"), Err(ParseError::Invalid));
        assert_eq!(Price::from_str("-1"), Err(ParseError::Negative));
    }

    #[test]
    fn to_string() {
        assert_eq!(Price::from_str("123.45").unwrap().to_string(), "123.45");
        assert_eq!(Price::from_str("123.40").unwrap().to_string(), "123.4");
        assert_eq!(Price::from_str("123.00").unwrap().to_string(), "123");
        assert_eq!(Price::from(150_000).to_string(), "150000");
    }

    #[test]
    fn compares_numerically() {
        assert!(Price::from_str("99.99").unwrap() < Price::from(100));
        assert_eq!(
            Price::from_str("100.00").unwrap(),
            Price::from_str("100").unwrap(),
        );
    }

    #[test]
    fn deserializes_from_string_and_number() {
        assert_eq!(
            serde_json::from_str::<Price>(r#""2500.50""#).unwrap(),
            Price::from_str("2500.5").unwrap(),
        );
        assert_eq!(
            serde_json::from_str::<Price>("2500").unwrap(),
            Price::from(2500),
        );
        assert!(serde_json::from_str::<Price>("-3").is_err());
        assert_eq!(
            serde_json::to_string(&Price::from(2500)).unwrap(),
            r#""2500""#,
        );
    }
}
