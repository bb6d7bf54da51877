//! Back-office authentication endpoints.

use axum::{extract::rejection::JsonRejection, Extension, Json};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use secrecy::SecretBox;
use serde::Deserialize;
use serde_json::json;
use service::{
    command::{self, Command as _},
    domain::user,
};

use super::{non_empty, Settings, ValidationError};
use crate::{error::AuthError, AsError, Error, Service};

/// Body of the [`login`] endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Credentials {
    /// Email of a back-office user.
    pub email: Option<String>,

    /// Password of a back-office user.
    pub password: Option<String>,
}

/// Signs an administrator in, storing the session token in a cookie.
///
/// # Errors
///
/// Possible error codes:
/// - `MISSING_CREDENTIALS` - email or password is missing;
/// - `WRONG_CREDENTIALS` - email or password is wrong;
/// - `NOT_ADMIN` - the user is not an administrator.
#[tracing::instrument(skip_all, fields(api.name = "auth.login"))]
pub async fn login(
    Extension(service): Extension<Service>,
    Extension(settings): Extension<Settings>,
    jar: CookieJar,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(CookieJar, Json<serde_json::Value>), Error> {
    let Json(Credentials { email, password }) =
        body.map_err(AsError::into_error)?;
    let (Some(email), Some(password)) = (non_empty(email), non_empty(password))
    else {
        return Err(ValidationError::Credentials.into());
    };
    let email = user::Email::new(email.trim())
        .ok_or(AuthError::WrongCredentials)?;

    let command::create_user_session::Output { token, user, .. } = service
        .execute(command::CreateUserSession {
            email,
            password: SecretBox::new(Box::new(password.into())),
        })
        .await
        .map_err(AsError::into_error)?;

    let cookie = Cookie::build((
        settings.session.cookie_name.clone(),
        token.to_string(),
    ))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(settings.session.secure)
    .max_age(
        time::Duration::try_from(settings.session_ttl)
            .unwrap_or(time::Duration::MAX),
    );

    tracing::info!(user.id = %user.id, "administrator signed in");

    Ok((
        jar.add(cookie),
        Json(json!({
            "success": true,
            "user": {
                "id": user.id,
                "name": user.name,
                "email": user.email,
            },
        })),
    ))
}

/// Signs out, removing the session cookie.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
#[tracing::instrument(skip_all, fields(api.name = "auth.logout"))]
pub async fn logout(
    Extension(settings): Extension<Settings>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    let cookie =
        Cookie::build((settings.session.cookie_name.clone(), "")).path("/");

    (jar.remove(cookie), Json(json!({ "success": true })))
}
