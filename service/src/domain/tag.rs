//! [`Tag`] definitions.

use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::Property;

/// Free-form descriptive label attached to [`Property`]s.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Tag {
    /// ID of this [`Tag`].
    pub id: Id,

    /// Unique [`Name`] of this [`Tag`].
    pub name: Name,

    /// Unique [`Slug`] of this [`Tag`].
    pub slug: Slug,
}

/// ID of a [`Tag`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
#[serde(transparent)]
pub struct Id(i32);

define_text! {
    #[doc = "Name of a [`Tag`]."]
    Name(max = 50)
}

define_text! {
    #[doc = "Slug of a [`Tag`]."]
    Slug(max = 50)
}
