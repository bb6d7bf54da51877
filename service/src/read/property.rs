//! [`Property`]-related read definitions.

use common::Price;
use derive_more::{Deref, From, Into};
use serde::{Deserialize, Serialize};

use crate::domain::{property, Property, Tag};

/// [`Property`] enriched with its [`Tag`]s.
///
/// A [`Property`] without [`Tag`]s has an empty list of them.
#[derive(Clone, Debug, Deref, Deserialize, Serialize)]
pub struct WithTags {
    /// The [`Property`] itself.
    #[deref]
    #[serde(flatten)]
    pub property: Property,

    /// [`Tag`]s of the [`Property`], in the order they were fetched.
    pub tags: Vec<Tag>,
}

/// Statistics over the published [`Property`]s.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Total number of published [`Property`]s.
    pub total: u64,

    /// Number of published [`Property`]s for sale.
    pub for_sale: u64,

    /// Number of published [`Property`]s for rent.
    pub for_rent: u64,

    /// Average [`Price`], rounded to cents.
    pub avg_price: Option<Price>,

    /// Minimal [`Price`].
    pub min_price: Option<Price>,

    /// Maximal [`Price`].
    pub max_price: Option<Price>,

    /// Top [`Stats::TOP_CITIES`] cities by the number of [`Property`]s.
    pub cities: Vec<CityCount>,
}

impl Stats {
    /// Number of cities listed in [`Stats::cities`].
    pub const TOP_CITIES: usize = 5;
}

/// Number of published [`Property`]s in a [`property::City`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CityCount {
    /// The [`property::City`].
    pub city: property::City,

    /// Number of [`Property`]s in the [`property::City`].
    pub count: u64,
}

/// [`property::Slug`]s of all the public [`Property`]s, ordered by ID.
#[derive(Clone, Debug, Default, From, Into)]
pub struct Slugs(pub Vec<property::Slug>);

pub mod list {
    //! [`Property`] list definitions.

    use std::cmp::Ordering;

    use common::{define_kind, define_pagination, pagination::Order, Price};

    use crate::domain::{property, Property};

    use super::WithTags;

    define_pagination!(WithTags, Filter, Sort);

    /// Filter of a [`Property`] list.
    ///
    /// Public visibility is always required, so only published and available
    /// [`Property`]s match. All the provided constraints are combined with a
    /// logical AND.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Exact [`property::Operation`] to match.
        pub operation: Option<property::Operation>,

        /// Exact [`property::Kind`] to match.
        pub kind: Option<property::Kind>,

        /// Exact [`property::City`] to match.
        pub city: Option<property::City>,

        /// Case-insensitive substring of a [`property::Title`] to match.
        pub search: Option<String>,

        /// Inclusive lower bound of a [`Price`].
        pub min_price: Option<Price>,

        /// Inclusive upper bound of a [`Price`].
        pub max_price: Option<Price>,

        /// Inclusive lower bound of rooms number.
        pub min_rooms: Option<u16>,

        /// Inclusive lower bound of bathrooms number.
        pub min_bathrooms: Option<u16>,

        /// [`property::RentalPeriod`] a rental price must be set for.
        pub rental_period: Option<property::RentalPeriod>,
    }

    impl Filter {
        /// Checks whether the provided [`Property`] matches this [`Filter`].
        #[must_use]
        pub fn matches(&self, property: &Property) -> bool {
            let Self {
                operation,
                kind,
                city,
                search,
                min_price,
                max_price,
                min_rooms,
                min_bathrooms,
                rental_period,
            } = self;

            property.is_public()
                && operation.map_or(true, |o| property.operation == o)
                && kind.map_or(true, |k| property.kind == k)
                && city.as_ref().map_or(true, |c| property.city == *c)
                && search.as_ref().map_or(true, |s| {
                    AsRef::<str>::as_ref(&property.title)
                        .to_lowercase()
                        .contains(&s.to_lowercase())
                })
                && min_price.map_or(true, |p| property.price >= p)
                && max_price.map_or(true, |p| property.price <= p)
                && min_rooms.map_or(true, |r| property.rooms >= r)
                && min_bathrooms.map_or(true, |b| property.bathrooms >= b)
                && rental_period.map_or(true, |p| {
                    property
                        .rental_prices
                        .as_ref()
                        .is_some_and(|prices| prices.contains_key(&p))
                })
        }
    }

    define_kind! {
        #[doc = "Sorting of a [`Property`] list.\n\n\
                 Ties are always broken by [`property::Id`] ascending."]
        enum Sort {
            #[doc = "Cheapest first."]
            PriceAsc = "price_asc",

            #[doc = "Most expensive first."]
            PriceDesc = "price_desc",

            #[doc = "Most recently published first, unpublished last."]
            Newest = "newest",

            #[doc = "Most viewed first."]
            Views = "views",
        }
    }

    impl Default for Sort {
        fn default() -> Self {
            Self::Newest
        }
    }

    impl Sort {
        /// Returns the [`Order`] of the primary key of this [`Sort`].
        #[must_use]
        pub const fn order(self) -> Order {
            match self {
                Self::PriceAsc => Order::Ascending,
                Self::PriceDesc | Self::Newest | Self::Views => {
                    Order::Descending
                }
            }
        }

        /// Compares the provided [`Property`]s according to this [`Sort`].
        ///
        /// Produces a total order.
        #[must_use]
        pub fn compare(self, a: &Property, b: &Property) -> Ordering {
            let primary = match self {
                Self::PriceAsc | Self::PriceDesc => a.price.cmp(&b.price),
                Self::Views => a.views_count.cmp(&b.views_count),
                // `None` is less than `Some`, so unpublished ones go last.
                Self::Newest => a.published_at.cmp(&b.published_at),
            };
            self.order().apply(primary).then(a.id.cmp(&b.id))
        }
    }

    /// Total count of [`Property`] list items matching a [`Filter`].
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct TotalCount(pub u64);

    impl From<TotalCount> for u64 {
        fn from(count: TotalCount) -> Self {
            count.0
        }
    }
}
