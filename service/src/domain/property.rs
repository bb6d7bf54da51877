//! [`Property`] definitions.

use std::{collections::BTreeMap, sync::LazyLock};

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Price};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::user;

/// Real-estate listing for sale or rent.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// URL-safe unique [`Slug`] of this [`Property`].
    pub slug: Slug,

    /// [`Title`] of this [`Property`].
    pub title: Title,

    /// [`Description`] of this [`Property`].
    pub description: Description,

    /// Asking [`Price`] of this [`Property`].
    pub price: Price,

    /// [`Operation`] this [`Property`] is listed for.
    pub operation: Operation,

    /// [`Kind`] of this [`Property`].
    #[serde(rename = "propertyType")]
    pub kind: Kind,

    /// [`Address`] of this [`Property`].
    pub address: Address,

    /// [`City`] this [`Property`] is located in.
    pub city: City,

    /// [`State`] this [`Property`] is located in.
    pub state: Option<State>,

    /// [`Country`] this [`Property`] is located in.
    pub country: Option<Country>,

    /// [`GpsLocation`] of this [`Property`].
    pub gps_location: Option<GpsLocation>,

    /// Covered area of this [`Property`], in square meters.
    pub area: u32,

    /// Land area of this [`Property`], in square meters.
    pub land_area: Option<u32>,

    /// Number of rooms in this [`Property`].
    pub rooms: u16,

    /// Number of bathrooms in this [`Property`].
    pub bathrooms: u16,

    /// Number of parking spaces of this [`Property`].
    pub parking_spaces: u16,

    /// Number of floors of this [`Property`].
    pub floors: u16,

    /// Year this [`Property`] was built in.
    pub year_built: Option<u16>,

    /// Main [`ImageUrl`] of this [`Property`].
    pub featured_image: Option<ImageUrl>,

    /// Ordered gallery of this [`Property`].
    pub gallery: Vec<ImageUrl>,

    /// ID of the agent [`User`] responsible for this [`Property`].
    ///
    /// [`User`]: crate::domain::User
    pub agent_id: user::Id,

    /// [`Status`] of this [`Property`].
    pub status: Status,

    /// Number of times this [`Property`] has been viewed.
    pub views_count: u32,

    /// Indicator whether this [`Property`] is promoted editorially.
    pub is_featured: bool,

    /// Indicator whether this [`Property`] is available.
    pub is_available: bool,

    /// [`RentalPrices`] of this [`Property`], for [`Operation::Rent`] only.
    pub rental_prices: Option<RentalPrices>,

    /// [`DateTime`] when this [`Property`] was published.
    pub published_at: Option<PublicationDateTime>,

    /// [`DateTime`] when this [`Property`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Property`] was last updated.
    pub updated_at: UpdateDateTime,
}

impl Property {
    /// Indicates whether this [`Property`] is visible to the public.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.status == Status::Published && self.is_available
    }
}

/// ID of a [`Property`].
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

/// URL-safe slug of a [`Property`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(into = "String", try_from = "String")]
pub struct Slug(String);

impl Slug {
    /// Creates a new [`Slug`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `slug` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Creates a new [`Slug`] if the given `slug` is valid.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Option<Self> {
        let slug = slug.into();
        Self::check(&slug).then_some(Self(slug))
    }

    /// Checks whether the given `slug` is a valid [`Slug`].
    fn check(slug: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Slug`] invariants:
        /// - Must consist of lowercase ASCII letters and digits;
        /// - Words must be separated with single hyphens;
        /// - Must not start/end with a hyphen.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex")
        });

        let slug = slug.as_ref();
        slug.len() <= 200 && REGEX.is_match(slug)
    }
}

impl FromStr for Slug {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Slug`")
    }
}

impl TryFrom<String> for Slug {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `Slug`")
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

define_text! {
    #[doc = "Title of a [`Property`]."]
    Title(max = 200)
}

define_text! {
    #[doc = "Description of a [`Property`]."]
    Description(max = 20_000)
}

define_text! {
    #[doc = "Street address of a [`Property`]."]
    Address(max = 300)
}

define_text! {
    #[doc = "City of a [`Property`]."]
    City(max = 100)
}

define_text! {
    #[doc = "State of a [`Property`]."]
    State(max = 100)
}

define_text! {
    #[doc = "Country of a [`Property`]."]
    Country(max = 100)
}

define_text! {
    #[doc = "URL of a [`Property`] image."]
    ImageUrl(max = 500)
}

/// GPS location of a [`Property`] in a `"lat, lng"` format.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    PartialEq,
    Serialize,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(into = "String", try_from = "String")]
pub struct GpsLocation(String);

impl GpsLocation {
    /// Creates a new [`GpsLocation`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = Self(location.into());
        location.coordinates().is_some().then_some(location)
    }

    /// Returns the latitude and longitude of this [`GpsLocation`].
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let (lat, lng) = self.0.split_once(',')?;
        let lat = lat.trim().parse::<f64>().ok()?;
        let lng = lng.trim().parse::<f64>().ok()?;
        ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng))
            .then_some((lat, lng))
    }
}

impl TryFrom<String> for GpsLocation {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `GpsLocation`")
    }
}

impl From<GpsLocation> for String {
    fn from(location: GpsLocation) -> Self {
        location.0
    }
}

/// Prices of a [`Property`] for rent by a [`RentalPeriod`].
pub type RentalPrices = BTreeMap<RentalPeriod, Price>;

define_kind! {
    #[doc = "Operation a [`Property`] is listed for."]
    enum Operation {
        #[doc = "[`Property`] is for sale."]
        Sale = "sale",

        #[doc = "[`Property`] is for rent."]
        Rent = "rent",
    }
}

define_kind! {
    #[doc = "Kind of a [`Property`]."]
    enum Kind {
        #[doc = "A house."]
        House = "house",

        #[doc = "An apartment in a building."]
        Apartment = "apartment",

        #[doc = "An office."]
        Office = "office",

        #[doc = "A commercial premise."]
        Commercial = "commercial",

        #[doc = "A plot of land."]
        Land = "land",
    }
}

define_kind! {
    #[doc = "Publication status of a [`Property`]."]
    enum Status {
        #[doc = "[`Property`] is being prepared and is not public."]
        Draft = "draft",

        #[doc = "[`Property`] is published."]
        Published = "published",

        #[doc = "[`Property`] has been sold."]
        Sold = "sold",

        #[doc = "[`Property`] has been rented."]
        Rented = "rented",
    }
}

define_kind! {
    #[doc = "Period a rental price of a [`Property`] applies to."]
    enum RentalPeriod {
        #[doc = "Per day."]
        Daily = "daily",

        #[doc = "Per week."]
        Weekly = "weekly",

        #[doc = "Per month."]
        Monthly = "monthly",

        #[doc = "Long-term contract."]
        LongTerm = "longTerm",
    }
}

/// [`DateTime`] when a [`Property`] was published.
pub type PublicationDateTime = DateTimeOf<(Property, unit::Publication)>;

/// [`DateTime`] when a [`Property`] was created.
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;

/// [`DateTime`] when a [`Property`] was last updated.
pub type UpdateDateTime = DateTimeOf<(Property, unit::Update)>;

#[cfg(test)]
mod spec {
    use super::{GpsLocation, Slug, Title};

    #[test]
    fn validates_slug() {
        assert!(Slug::new("casa-en-palermo-3-ambientes").is_some());
        assert!(Slug::new("casa").is_some());

        assert!(Slug::new("").is_none());
        assert!(Slug::new("-casa").is_none());
        assert!(Slug::new("casa-").is_none());
        assert!(Slug::new("casa--grande").is_none());
        assert!(Slug::new("Casa").is_none());
        assert!(Slug::new("casa grande").is_none());
    }

    #[test]
    fn validates_text() {
        assert!(Title::new("Casa en Palermo").is_some());
        assert!(Title::new(" Casa").is_none());
        assert!(Title::new("").is_none());
        assert!(Title::new("a".repeat(201)).is_none());
    }

    #[test]
    fn parses_gps_coordinates() {
        let location = GpsLocation::new("-34.6037, -58.3816").unwrap();
        assert_eq!(location.coordinates(), Some((-34.6037, -58.3816)));

        assert!(GpsLocation::new("-34.6037").is_none());
        assert!(GpsLocation::new("north, south").is_none());
        assert!(GpsLocation::new("91, 0").is_none());
    }
}
