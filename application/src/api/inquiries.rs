//! [`Inquiry`] submission endpoint.
//!
//! [`Inquiry`]: service::domain::Inquiry

use axum::{extract::rejection::JsonRejection, Extension, Json};
use http::StatusCode;
use serde::Deserialize;
use service::{
    command::{self, Command as _},
    domain::{inquiry, user, Inquiry},
};

use super::{non_empty, ValidationError};
use crate::{AsError, Error, Service};

/// Body of the [`create`] endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInquiry {
    /// ID of the inquired property.
    pub property_id: Option<i32>,

    /// Name of the inquiring client.
    pub client_name: Option<String>,

    /// Email of the inquiring client.
    pub client_email: Option<String>,

    /// Phone of the inquiring client.
    pub client_phone: Option<String>,

    /// Message of the client.
    pub message: Option<String>,
}

impl NewInquiry {
    /// Validates this [`NewInquiry`] into a [`command::CreateInquiry`].
    ///
    /// Empty optional fields are treated as absent.
    ///
    /// # Errors
    ///
    /// If any of the fields is missing or malformed.
    pub fn into_command(
        self,
    ) -> Result<command::CreateInquiry, ValidationError> {
        let Self {
            property_id,
            client_name,
            client_email,
            client_phone,
            message,
        } = self;

        Ok(command::CreateInquiry {
            property_id: property_id.ok_or(ValidationError::PropertyId)?.into(),
            client_name: non_empty(client_name)
                .map(|n| user::Name::new(n.trim()).ok_or(ValidationError::Name))
                .transpose()?,
            client_email: non_empty(client_email)
                .and_then(|e| user::Email::new(e.trim()))
                .ok_or(ValidationError::Email)?,
            client_phone: non_empty(client_phone)
                .map(|p| user::Phone::new(p.trim()).ok_or(ValidationError::Phone))
                .transpose()?,
            message: message
                .and_then(|m| inquiry::Message::new(m.trim()))
                .ok_or(ValidationError::Message)?,
        })
    }
}

/// Submits a new [`Inquiry`] about a public property.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_*` - the body is malformed;
/// - `PROPERTY_NOT_FOUND` - there is no public property with the ID.
#[tracing::instrument(skip_all, fields(api.name = "inquiries.create"))]
pub async fn create(
    Extension(service): Extension<Service>,
    body: Result<Json<NewInquiry>, JsonRejection>,
) -> Result<(StatusCode, Json<Inquiry>), Error> {
    let Json(body) = body.map_err(AsError::into_error)?;
    let cmd = body.into_command()?;

    service
        .execute(cmd)
        .await
        .map(|inquiry| (StatusCode::CREATED, Json(inquiry)))
        .map_err(AsError::into_error)
}

#[cfg(test)]
mod spec {
    use super::{NewInquiry, ValidationError};

    fn body() -> NewInquiry {
        serde_json::from_value(serde_json::json!({
            "propertyId": 7,
            "clientName": "Ana",
            "clientEmail": "ana@example.com",
            "clientPhone": "",
            "message": "Is it still available?",
        }))
        .unwrap()
    }

    #[test]
    fn validates_body() {
        let cmd = body().into_command().unwrap();

        assert_eq!(i32::from(cmd.property_id), 7);
        assert_eq!(cmd.client_name.map(String::from).as_deref(), Some("Ana"));
        assert!(cmd.client_phone.is_none());
    }

    #[test]
    fn requires_email_and_message() {
        let no_email = NewInquiry {
            client_email: Some("not an email".into()),
            ..body()
        };
        let no_message = NewInquiry {
            message: Some("   ".into()),
            ..body()
        };
        let no_property = NewInquiry {
            property_id: None,
            ..body()
        };

        assert!(matches!(
            no_email.into_command(),
            Err(ValidationError::Email),
        ));
        assert!(matches!(
            no_message.into_command(),
            Err(ValidationError::Message),
        ));
        assert!(matches!(
            no_property.into_command(),
            Err(ValidationError::PropertyId),
        ));
    }
}
