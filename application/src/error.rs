//! [`Error`]-related definitions.

use std::fmt;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::{IntoResponse, Response},
    Json,
};
use derive_more::Error as StdError;
use itertools::Itertools as _;
use serde::Serialize;
use service::{command, infra::database};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// HTTP API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Creates a new [`Error`] representing a malformed request.
    #[must_use]
    pub fn bad_request(msg: &impl ToString) -> Self {
        Self {
            code: "BAD_REQUEST",
            status_code: http::StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

/// JSON body of an [`Error`] response.
#[derive(Debug, Serialize)]
struct Body<'e> {
    /// Described [`Error`].
    error: BodyError<'e>,
}

/// JSON representation of an [`Error`].
#[derive(Debug, Serialize)]
struct BodyError<'e> {
    /// [`Error::code`].
    code: Code,

    /// [`Error::message`].
    message: &'e str,

    /// Frames of the [`Error::backtrace`].
    backtrace: Vec<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.status_code.is_server_error() {
            tracing::error!("{self}");
        }

        let body = Body {
            error: BodyError {
                code: self.code,
                message: &self.message,
                backtrace: self
                    .backtrace
                    .iter()
                    .flat_map(|trace| trace.iter())
                    .map(ToString::to_string)
                    .collect(),
            },
        };
        (self.status_code, Json(body)).into_response()
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for JsonRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::bad_request(&self.body_text()))
    }
}

impl AsError for QueryRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::bad_request(&self.body_text()))
    }
}

impl AsError for PathRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::bad_request(&self.body_text()))
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenDecodeError(_) | Self::UserNotExists(_) => {
                Some(AuthError::AuthorizationRequired.into())
            }
            Self::NotAdmin => Some(AuthError::NotAdmin.into()),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::NotAdmin => Some(AuthError::NotAdmin.into()),
            Self::WrongCredentials => {
                Some(AuthError::WrongCredentials.into())
            }
        }
    }
}

impl AsError for command::create_inquiry::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => {
                Some(NotFoundError::Property.into())
            }
        }
    }
}

impl AsError for command::update_inquiry::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InquiryNotExists(_) => Some(NotFoundError::Inquiry.into()),
        }
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(Error {
                code: "EMAIL_OCCUPIED",
                status_code: http::StatusCode::CONFLICT,
                message: self.to_string(),
                backtrace: None,
            }),
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,

        #[code = "WRONG_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Wrong email or password"]
        WrongCredentials,

        #[code = "NOT_ADMIN"]
        #[status = FORBIDDEN]
        #[message = "Administrator permissions required"]
        NotAdmin,
    }
}

define_error! {
    enum NotFoundError {
        #[code = "PROPERTY_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Property does not exist"]
        Property,

        #[code = "INQUIRY_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Inquiry does not exist"]
        Inquiry,
    }
}

#[cfg(test)]
mod spec {
    use axum::{body, response::IntoResponse as _};
    use http::StatusCode;

    use super::{AuthError, Error, NotFoundError};

    async fn body(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn renders_json_body() {
        let (status, json) = body(NotFoundError::Property.into()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "PROPERTY_NOT_FOUND");
        assert_eq!(json["error"]["message"], "Property does not exist");
        assert_eq!(json["error"]["backtrace"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn renders_internal_errors() {
        let (status, json) = body(Error::internal(&"boom")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "INTERNAL_SERVER_ERROR");
        assert_eq!(json["error"]["message"], "boom");
    }

    #[test]
    fn maps_auth_errors() {
        let error = Error::from(AuthError::NotAdmin);

        assert_eq!(error.status_code, StatusCode::FORBIDDEN);
        assert_eq!(error.code, "NOT_ADMIN");
    }
}
