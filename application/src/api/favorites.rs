//! Favorite [`Property`]s resolution endpoint.
//!
//! [`Property`]: service::domain::Property

use axum::{Extension, Json};
use axum_extra::extract::{Query, QueryRejection};
use serde::Deserialize;
use service::{domain::property, query};

use super::{execute_or, properties::Properties};
use crate::{Error, Service};

/// Query string of the [`resolve`] endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Params {
    /// Requested [`property::Id`]s, possibly malformed.
    #[serde(default)]
    pub ids: Vec<String>,
}

impl Params {
    /// Returns the well-formed [`property::Id`]s of these [`Params`],
    /// ignoring the malformed ones.
    #[must_use]
    pub fn ids(&self) -> Vec<property::Id> {
        self.ids
            .iter()
            .filter_map(|id| id.trim().parse::<i32>().ok())
            .map(property::Id::from)
            .collect()
    }
}

/// Resolves favorite [`property::Id`]s into public properties.
///
/// Hidden or missing properties are skipped. Unavailable storage results in
/// an empty list.
#[tracing::instrument(skip_all, fields(api.name = "favorites.resolve"))]
pub async fn resolve(
    Extension(service): Extension<Service>,
    params: Result<Query<Params>, QueryRejection>,
) -> Result<Json<Properties>, Error> {
    let Query(params) = params.map_err(|e| Error::bad_request(&e))?;

    let ids = params.ids();
    if ids.is_empty() {
        return Ok(Json(Properties::from(Vec::new())));
    }

    let properties =
        execute_or(&service, query::properties::ByIds(ids), vec![]).await;

    Ok(Json(properties.into()))
}

#[cfg(test)]
mod spec {
    use axum::extract::FromRequestParts as _;
    use axum_extra::extract::Query;
    use service::domain::property;

    use super::Params;

    async fn params(uri: &str) -> Params {
        let (mut parts, ()) = http::Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        Query::<Params>::from_request_parts(&mut parts, &())
            .await
            .unwrap()
            .0
    }

    #[tokio::test]
    async fn ignores_malformed_ids() {
        let params = params("/api/favorites?ids=3&ids=abc&ids=&ids=1").await;

        assert_eq!(
            params.ids(),
            [property::Id::from(3), property::Id::from(1)],
        );
    }

    #[tokio::test]
    async fn accepts_missing_ids() {
        let params = params("/api/favorites").await;

        assert!(params.ids().is_empty());
    }
}
