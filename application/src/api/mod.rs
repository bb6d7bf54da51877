//! HTTP API definitions.

pub mod admin;
pub mod auth;
pub mod favorites;
pub mod inquiries;
pub mod properties;
pub mod sitemap;

use std::{str::FromStr, time::Duration};

use axum::{
    routing::{get, post},
    Router,
};
use service::{infra::database, query::Query};
use tracerr::Traced;

use crate::{config, define_error};

/// Settings of the HTTP API handlers, shared as an [`Extension`].
///
/// [`Extension`]: axum::Extension
#[derive(Clone, Debug)]
pub struct Settings {
    /// Number of nodes listed when no limit is requested.
    pub page_size: usize,

    /// Public URL of the website.
    pub site_url: String,

    /// Back-office session cookie configuration.
    pub session: config::Session,

    /// Lifetime of a back-office session.
    pub session_ttl: Duration,
}

/// Builds the [`Router`] of the whole HTTP API.
///
/// [`Service`] and [`Settings`] are expected to be provided as
/// [`Extension`]s.
///
/// [`Extension`]: axum::Extension
/// [`Service`]: crate::Service
pub fn router() -> Router {
    Router::new()
        .route("/api/properties", get(properties::list))
        .route("/api/properties/featured", get(properties::featured))
        .route("/api/properties/stats", get(properties::stats))
        .route("/api/properties/:slug", get(properties::detail))
        .route("/api/favorites", get(favorites::resolve))
        .route("/api/inquiries", post(inquiries::create))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .nest("/api/admin", admin::router())
        .route("/sitemap.xml", get(sitemap::sitemap))
}

/// Parses an optional request value, treating an empty one as absent.
///
/// # Errors
///
/// With the provided [`ValidationError`] if the value cannot be parsed.
pub(crate) fn parse_opt<T: FromStr>(
    value: Option<String>,
    err: ValidationError,
) -> Result<Option<T>, ValidationError> {
    non_empty(value).map(|v| v.parse().map_err(|_| err)).transpose()
}

/// Filters out an empty request value.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Executes the provided `query`, answering the `fallback` if the storage
/// fails.
///
/// Public pages show nothing rather than an error when the storage is down.
pub(crate) async fn execute_or<Db, Q, T>(
    service: &service::Service<Db>,
    query: Q,
    fallback: T,
) -> T
where
    service::Service<Db>: Query<Q, Ok = T, Err = Traced<database::Error>>,
{
    service.execute(query).await.unwrap_or_else(|e| {
        tracing::error!("storage query failed, answering fallback: {e}");
        fallback
    })
}

define_error! {
    enum ValidationError {
        #[code = "INVALID_OPERATION"]
        #[status = BAD_REQUEST]
        #[message = "Operation must be one of: sale, rent"]
        Operation,

        #[code = "INVALID_PROPERTY_TYPE"]
        #[status = BAD_REQUEST]
        #[message = "Property type must be one of: house, apartment, office, \
                     commercial, land"]
        PropertyType,

        #[code = "INVALID_CITY"]
        #[status = BAD_REQUEST]
        #[message = "City is malformed"]
        City,

        #[code = "INVALID_PRICE"]
        #[status = BAD_REQUEST]
        #[message = "Price must be a non-negative decimal number"]
        Price,

        #[code = "INVALID_ROOMS"]
        #[status = BAD_REQUEST]
        #[message = "Rooms number must be a non-negative integer"]
        Rooms,

        #[code = "INVALID_BATHROOMS"]
        #[status = BAD_REQUEST]
        #[message = "Bathrooms number must be a non-negative integer"]
        Bathrooms,

        #[code = "INVALID_RENTAL_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "Rental period must be one of: daily, weekly, monthly, \
                     longTerm"]
        RentalPeriod,

        #[code = "INVALID_PAGINATION"]
        #[status = BAD_REQUEST]
        #[message = "Limit must be positive and offset must be non-negative \
                     integers"]
        Pagination,

        #[code = "INVALID_PROPERTY_ID"]
        #[status = BAD_REQUEST]
        #[message = "Property ID must be an integer"]
        PropertyId,

        #[code = "INVALID_INQUIRY_ID"]
        #[status = BAD_REQUEST]
        #[message = "Inquiry ID must be an integer"]
        InquiryId,

        #[code = "INVALID_INQUIRY_STATUS"]
        #[status = BAD_REQUEST]
        #[message = "Inquiry status must be one of: new, contacted, \
                     qualified, closed"]
        InquiryStatus,

        #[code = "INVALID_EMAIL"]
        #[status = BAD_REQUEST]
        #[message = "Email is missing or malformed"]
        Email,

        #[code = "INVALID_NAME"]
        #[status = BAD_REQUEST]
        #[message = "Name is malformed"]
        Name,

        #[code = "INVALID_PHONE"]
        #[status = BAD_REQUEST]
        #[message = "Phone is malformed"]
        Phone,

        #[code = "INVALID_MESSAGE"]
        #[status = BAD_REQUEST]
        #[message = "Message is missing or too long"]
        Message,

        #[code = "INVALID_NOTE"]
        #[status = BAD_REQUEST]
        #[message = "Note is malformed or too long"]
        Note,

        #[code = "MISSING_CREDENTIALS"]
        #[status = BAD_REQUEST]
        #[message = "Email and password are required"]
        Credentials,
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use serde_json::json;
    use service::{
        domain::property,
        infra::Memory,
        query,
        read::property::{list, Slugs, Stats},
        Config, Service,
    };

    use super::{execute_or, parse_opt, properties::Properties, ValidationError};

    fn unavailable() -> Service<Memory> {
        let db = Memory::new();
        db.set_unavailable(true);
        Service::new(
            Config::with_secret(b"secret", Duration::from_secs(60)),
            db,
        )
    }

    #[tokio::test]
    async fn answers_empty_listing_when_storage_fails() {
        let service = unavailable();

        let page = execute_or(
            &service,
            query::properties::List(list::Selector {
                arguments: list::Arguments::first(50),
                filter: list::Filter::default(),
                sort: list::Sort::Newest,
            }),
            list::Page::empty(),
        )
        .await;

        assert_eq!(
            serde_json::to_value(Properties::from(page)).unwrap(),
            json!({"properties": [], "total": 0}),
        );
    }

    #[tokio::test]
    async fn answers_empty_lists_when_storage_fails() {
        let service = unavailable();

        let featured =
            execute_or(&service, query::properties::Featured, vec![]).await;
        let favorites = execute_or(
            &service,
            query::properties::ByIds(vec![property::Id::from(1)]),
            vec![],
        )
        .await;
        let stats = execute_or(
            &service,
            query::properties::Stats::by(()),
            Stats::default(),
        )
        .await;
        let slugs = execute_or(
            &service,
            query::properties::Slugs::by(()),
            Slugs::default(),
        )
        .await;

        assert!(featured.is_empty());
        assert!(favorites.is_empty());
        assert_eq!(stats.total, 0);
        assert!(slugs.0.is_empty());
    }

    #[test]
    fn treats_empty_values_as_absent() {
        let parsed =
            parse_opt::<u16>(Some(String::new()), ValidationError::Rooms);

        assert_eq!(parsed.unwrap(), None);
    }

    #[test]
    fn rejects_unparsable_values() {
        let parsed = parse_opt::<u16>(Some("-1".into()), ValidationError::Rooms);

        assert!(matches!(parsed, Err(ValidationError::Rooms)));
        assert_eq!(
            parse_opt::<u16>(Some("3".into()), ValidationError::Rooms).unwrap(),
            Some(3),
        );
    }
}
