//! Back-office endpoints, available to administrators only.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query,
    },
    middleware,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{inquiry, Inquiry},
    query,
    read::{self, inquiry::list},
};

use super::{non_empty, parse_opt, Settings, ValidationError};
use crate::{AdminSession, AsError, Error, Service};

/// Builds the [`Router`] of the back-office endpoints, gated by an
/// [`AdminSession`].
pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/inquiries", get(inquiries))
        .route("/inquiries/:id", patch(update_inquiry))
        .route_layer(middleware::from_extractor::<AdminSession>())
}

/// Returns the back-office [`read::Dashboard`].
#[tracing::instrument(skip_all, fields(api.name = "admin.dashboard"))]
pub async fn dashboard(
    Extension(service): Extension<Service>,
) -> Result<Json<read::Dashboard>, Error> {
    service
        .execute(query::Dashboard::by(()))
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Query string of the [`inquiries`] endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InquiriesParams {
    /// [`inquiry::Status`] to match.
    pub status: Option<String>,

    /// Maximum number of [`Inquiry`]s to return.
    pub limit: Option<String>,

    /// Number of [`Inquiry`]s to skip.
    pub offset: Option<String>,
}

impl InquiriesParams {
    /// Validates these [`InquiriesParams`] into a [`list::Selector`].
    ///
    /// # Errors
    ///
    /// If any of the parameters is malformed.
    pub fn into_selector(
        self,
        default_limit: usize,
    ) -> Result<list::Selector, ValidationError> {
        let Self {
            status,
            limit,
            offset,
        } = self;

        Ok(list::Selector {
            arguments: list::Arguments::new(
                parse_opt::<i64>(limit, ValidationError::Pagination)?,
                parse_opt::<i64>(offset, ValidationError::Pagination)?,
                i64::try_from(default_limit).unwrap_or(i64::MAX),
            )
            .ok_or(ValidationError::Pagination)?,
            filter: list::Filter {
                status: parse_opt(status, ValidationError::InquiryStatus)?,
            },
            sort: (),
        })
    }
}

/// Page of [`Inquiry`]s.
#[derive(Debug, Serialize)]
pub struct Inquiries {
    /// Listed [`Inquiry`]s.
    pub inquiries: Vec<Inquiry>,

    /// Total number of matching [`Inquiry`]s, regardless of pagination.
    pub total: u64,
}

/// Lists [`Inquiry`]s, the newest first.
#[tracing::instrument(skip_all, fields(api.name = "admin.inquiries"))]
pub async fn inquiries(
    Extension(service): Extension<Service>,
    Extension(settings): Extension<Settings>,
    params: Result<Query<InquiriesParams>, QueryRejection>,
) -> Result<Json<Inquiries>, Error> {
    let Query(params) = params.map_err(AsError::into_error)?;
    let selector = params.into_selector(settings.page_size)?;

    let page = service
        .execute(query::inquiries::List(selector))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Inquiries {
        inquiries: page.nodes,
        total: page.total,
    }))
}

/// Body of the [`update_inquiry`] endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InquiryUpdate {
    /// New [`inquiry::Status`].
    pub status: Option<String>,

    /// [`inquiry::Note`] to append.
    pub note: Option<String>,
}

impl InquiryUpdate {
    /// Validates this [`InquiryUpdate`] into a [`command::UpdateInquiry`].
    ///
    /// # Errors
    ///
    /// If any of the fields is malformed.
    pub fn into_command(
        self,
        id: inquiry::Id,
    ) -> Result<command::UpdateInquiry, ValidationError> {
        let Self { status, note } = self;

        Ok(command::UpdateInquiry {
            id,
            status: parse_opt(status, ValidationError::InquiryStatus)?,
            note: non_empty(note)
                .map(|n| inquiry::Note::new(n.trim()).ok_or(ValidationError::Note))
                .transpose()?,
        })
    }
}

/// Updates the status or notes of an [`Inquiry`].
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_*` - the ID or the body is malformed;
/// - `INQUIRY_NOT_FOUND` - there is no [`Inquiry`] with the ID.
#[tracing::instrument(
    skip_all,
    fields(api.name = "admin.update_inquiry", id = %id),
)]
pub async fn update_inquiry(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
    body: Result<Json<InquiryUpdate>, JsonRejection>,
) -> Result<Json<Inquiry>, Error> {
    let id = id
        .parse::<i32>()
        .map_err(|_| ValidationError::InquiryId)?
        .into();
    let Json(body) = body.map_err(AsError::into_error)?;
    let cmd = body.into_command(id)?;

    service
        .execute(cmd)
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

#[cfg(test)]
mod spec {
    use service::domain::inquiry;

    use super::{InquiriesParams, InquiryUpdate, ValidationError};

    #[test]
    fn parses_inquiries_params() {
        let selector = InquiriesParams {
            status: Some("contacted".into()),
            limit: Some("5".into()),
            offset: None,
        }
        .into_selector(50)
        .unwrap();

        assert_eq!(selector.filter.status, Some(inquiry::Status::Contacted));
        assert_eq!(selector.arguments.limit(), 5);

        assert!(matches!(
            InquiriesParams {
                status: Some("lost".into()),
                ..InquiriesParams::default()
            }
            .into_selector(50),
            Err(ValidationError::InquiryStatus),
        ));
    }

    #[test]
    fn parses_inquiry_update() {
        let cmd = InquiryUpdate {
            status: Some(String::new()),
            note: Some("Called back".into()),
        }
        .into_command(inquiry::Id::from(3))
        .unwrap();

        assert_eq!(cmd.status, None);
        assert_eq!(cmd.note.map(String::from).as_deref(), Some("Called back"));
    }
}
