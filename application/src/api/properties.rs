//! [`Property`] listing endpoints.
//!
//! [`Property`]: service::domain::Property

use axum::{
    extract::{rejection::QueryRejection, Path, Query},
    Extension, Json,
};
use common::Price;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::property,
    query,
    read::property::{list, Stats, WithTags},
};

use super::{execute_or, non_empty, parse_opt, Settings, ValidationError};
use crate::{error::NotFoundError, AsError, Error, Service};

/// Query string of the [`list`] endpoint.
///
/// Every parameter is optional, and an empty one is treated as absent.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// [`property::Operation`] to match.
    pub operation: Option<String>,

    /// [`property::Kind`] to match.
    pub property_type: Option<String>,

    /// [`property::City`] to match.
    pub city: Option<String>,

    /// Substring of a [`property::Title`] to match.
    pub search: Option<String>,

    /// Inclusive lower [`Price`] bound.
    pub min_price: Option<String>,

    /// Inclusive upper [`Price`] bound.
    pub max_price: Option<String>,

    /// Inclusive lower bound of rooms number.
    pub min_rooms: Option<String>,

    /// Inclusive lower bound of bathrooms number.
    pub min_bathrooms: Option<String>,

    /// [`property::RentalPeriod`] a rental price must be set for.
    pub rental_period: Option<String>,

    /// [`list::Sort`] to apply. Unknown one falls back to the default.
    pub sort_by: Option<String>,

    /// Maximum number of [`WithTags`] to return.
    pub limit: Option<String>,

    /// Number of [`WithTags`] to skip.
    pub offset: Option<String>,
}

impl ListParams {
    /// Validates these [`ListParams`] into a [`list::Selector`].
    ///
    /// # Errors
    ///
    /// If any of the parameters is malformed.
    pub fn into_selector(
        self,
        default_limit: usize,
    ) -> Result<list::Selector, ValidationError> {
        let Self {
            operation,
            property_type,
            city,
            search,
            min_price,
            max_price,
            min_rooms,
            min_bathrooms,
            rental_period,
            sort_by,
            limit,
            offset,
        } = self;

        let filter = list::Filter {
            operation: parse_opt(operation, ValidationError::Operation)?,
            kind: parse_opt(property_type, ValidationError::PropertyType)?,
            city: parse_opt(city, ValidationError::City)?,
            search: non_empty(search),
            min_price: parse_opt::<Price>(min_price, ValidationError::Price)?,
            max_price: parse_opt::<Price>(max_price, ValidationError::Price)?,
            min_rooms: parse_opt(min_rooms, ValidationError::Rooms)?,
            min_bathrooms: parse_opt(
                min_bathrooms,
                ValidationError::Bathrooms,
            )?,
            rental_period: parse_opt(
                rental_period,
                ValidationError::RentalPeriod,
            )?,
        };
        let sort = non_empty(sort_by)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        let arguments = list::Arguments::new(
            parse_opt::<i64>(limit, ValidationError::Pagination)?,
            parse_opt::<i64>(offset, ValidationError::Pagination)?,
            i64::try_from(default_limit).unwrap_or(i64::MAX),
        )
        .ok_or(ValidationError::Pagination)?;

        Ok(list::Selector {
            arguments,
            filter,
            sort,
        })
    }
}

/// List of [`WithTags`], optionally with their total count.
#[derive(Debug, Serialize)]
pub struct Properties {
    /// Listed [`WithTags`].
    pub properties: Vec<WithTags>,

    /// Total number of matching [`WithTags`], regardless of pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl From<list::Page> for Properties {
    fn from(page: list::Page) -> Self {
        Self {
            properties: page.nodes,
            total: Some(page.total),
        }
    }
}

impl From<Vec<WithTags>> for Properties {
    fn from(properties: Vec<WithTags>) -> Self {
        Self {
            properties,
            total: None,
        }
    }
}

/// Lists public [`WithTags`] matching the [`ListParams`].
///
/// Unavailable storage results in an empty list.
#[tracing::instrument(skip_all, fields(api.name = "properties.list"))]
pub async fn list(
    Extension(service): Extension<Service>,
    Extension(settings): Extension<Settings>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Properties>, Error> {
    let Query(params) = params.map_err(AsError::into_error)?;
    let selector = params.into_selector(settings.page_size)?;

    let page = execute_or(
        &service,
        query::properties::List(selector),
        list::Page::empty(),
    )
    .await;

    Ok(Json(page.into()))
}

/// Lists the featured [`WithTags`].
#[tracing::instrument(skip_all, fields(api.name = "properties.featured"))]
pub async fn featured(
    Extension(service): Extension<Service>,
) -> Json<Properties> {
    let featured =
        execute_or(&service, query::properties::Featured, vec![]).await;

    Json(featured.into())
}

/// Returns [`Stats`] of the published properties.
#[tracing::instrument(skip_all, fields(api.name = "properties.stats"))]
pub async fn stats(Extension(service): Extension<Service>) -> Json<Stats> {
    let stats = execute_or(
        &service,
        query::properties::Stats::by(()),
        Stats::default(),
    )
    .await;

    Json(stats)
}

/// Public [`WithTags`] along with the related ones.
#[derive(Debug, Serialize)]
pub struct Detail {
    /// Requested [`WithTags`].
    pub property: WithTags,

    /// [`WithTags`] in the same city.
    pub related: Vec<WithTags>,
}

/// Returns a public [`WithTags`] by its [`property::Slug`], counting a view
/// of it in background.
///
/// # Errors
///
/// Possible error codes:
/// - `PROPERTY_NOT_FOUND` - there is no public property with the slug.
#[tracing::instrument(
    skip_all,
    fields(api.name = "properties.detail", slug = %slug),
)]
pub async fn detail(
    Extension(service): Extension<Service>,
    Path(slug): Path<String>,
) -> Result<Json<Detail>, Error> {
    let slug = property::Slug::new(slug).ok_or(NotFoundError::Property)?;

    let property = service
        .execute(query::property::BySlug(slug.clone()))
        .await
        .map_err(AsError::into_error)?
        .ok_or(NotFoundError::Property)?;

    let related = service
        .execute(query::properties::Related::new(
            property.id,
            property.city.clone(),
        ))
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("failed to list related properties: {e}");
            vec![]
        });

    drop(tokio::spawn(async move {
        if let Err(e) = service
            .execute(command::IncrementPropertyViews { slug })
            .await
        {
            tracing::warn!("failed to count property view: {e}");
        }
    }));

    Ok(Json(Detail { property, related }))
}

#[cfg(test)]
mod spec {
    use service::{domain::property, read::property::list};

    use super::{ListParams, ValidationError};

    fn params(query: &str) -> ListParams {
        axum::extract::Query::<ListParams>::try_from_uri(
            &format!("/api/properties?{query}").parse().unwrap(),
        )
        .unwrap()
        .0
    }

    #[test]
    fn uses_defaults() {
        let selector = params("").into_selector(50).unwrap();

        assert_eq!(selector.arguments.limit(), 50);
        assert_eq!(selector.arguments.offset(), 0);
        assert_eq!(selector.sort, list::Sort::Newest);
        assert!(selector.filter.operation.is_none());
    }

    #[test]
    fn parses_filters() {
        let selector = params(
            "operation=rent&propertyType=apartment&city=Palermo\
             &search=luz&minPrice=1000.50&maxPrice=2000&minRooms=2\
             &minBathrooms=1&rentalPeriod=longTerm&sortBy=price_desc\
             &limit=10&offset=20",
        )
        .into_selector(50)
        .unwrap();

        let list::Filter {
            operation,
            kind,
            city,
            search,
            min_price,
            max_price,
            min_rooms,
            min_bathrooms,
            rental_period,
        } = selector.filter;
        assert_eq!(operation, Some(property::Operation::Rent));
        assert_eq!(kind, Some(property::Kind::Apartment));
        assert_eq!(city.as_ref().map(AsRef::<str>::as_ref), Some("Palermo"));
        assert_eq!(search.as_deref(), Some("luz"));
        assert_eq!(min_price.map(|p| p.to_string()).as_deref(), Some("1000.5"));
        assert_eq!(max_price.map(|p| p.to_string()).as_deref(), Some("2000"));
        assert_eq!(min_rooms, Some(2));
        assert_eq!(min_bathrooms, Some(1));
        assert_eq!(rental_period, Some(property::RentalPeriod::LongTerm));
        assert_eq!(selector.sort, list::Sort::PriceDesc);
        assert_eq!(selector.arguments.limit(), 10);
        assert_eq!(selector.arguments.offset(), 20);
    }

    #[test]
    fn treats_empty_values_as_absent() {
        let selector = params("operation=&city=&minPrice=&sortBy=&limit=")
            .into_selector(50)
            .unwrap();

        assert!(selector.filter.operation.is_none());
        assert!(selector.filter.city.is_none());
        assert!(selector.filter.min_price.is_none());
        assert_eq!(selector.arguments.limit(), 50);
    }

    #[test]
    fn falls_back_on_unknown_sort() {
        let selector = params("sortBy=cheapest").into_selector(50).unwrap();

        assert_eq!(selector.sort, list::Sort::Newest);
    }

    #[test]
    fn rejects_malformed_values() {
        for (query, expected) in [
            ("operation=swap", ValidationError::Operation),
            ("propertyType=castle", ValidationError::PropertyType),
            ("minPrice=-5", ValidationError::Price),
            ("maxPrice=cheap", ValidationError::Price),
            ("minRooms=two", ValidationError::Rooms),
            ("rentalPeriod=yearly", ValidationError::RentalPeriod),
            ("limit=0", ValidationError::Pagination),
            ("offset=-1", ValidationError::Pagination),
        ] {
            let err = params(query).into_selector(50).unwrap_err();
            assert_eq!(
                std::mem::discriminant(&err),
                std::mem::discriminant(&expected),
                "{query}",
            );
        }
    }
}
