//! [`AdminSession`] definitions.

use axum::{
    async_trait, extract::FromRequestParts, Extension, RequestPartsExt as _,
};
use axum_extra::extract::CookieJar;
use service::{
    command::{self, Command as _},
    domain::user::{session, Session},
};

use crate::{api::Settings, error::AuthError, AsError, Error, Service};

/// Authorized back-office [`Session`] of an administrator.
///
/// Extracted from the session cookie, rejecting the request if it's missing
/// or doesn't belong to an administrator anymore.
#[derive(Clone, Debug)]
pub struct AdminSession(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let Extension(service) = parts
            .extract::<Extension<Service>>()
            .await
            .map_err(|e| Error::internal(&e))?;
        let Extension(settings) = parts
            .extract::<Extension<Settings>>()
            .await
            .map_err(|e| Error::internal(&e))?;

        let token = CookieJar::from_headers(&parts.headers)
            .get(&settings.session.cookie_name)
            .map(|c| c.value().to_owned())
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::AuthorizationRequired)?;
        #[expect(unsafe_code, reason = "verified by `AuthorizeUserSession`")]
        let token = unsafe { session::Token::new_unchecked(token) };

        service
            .execute(command::AuthorizeUserSession { token })
            .await
            .map(Self)
            .map_err(AsError::into_error)
    }
}
