//! [`Command`] for creating a [`Session`].

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{session::Token, Email, Password};
use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a back-office [`Session`] by [`User`] credentials.
#[derive(Debug)]
pub struct CreateUserSession {
    /// [`Email`] of a [`User`].
    pub email: user::Email,

    /// [`Password`] of a [`User`].
    pub password: SecretBox<user::Password>,
}

/// Output of [`CreateUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// [`User`] whose [`Session`] has been created.
    pub user: User,

    /// [`DateTime`] when the [`Session`] expires.
    pub expires_at: session::ExpirationDateTime,
}

impl<Db> Command<CreateUserSession> for Service<Db>
where
    Db: for<'l> Database<
        Select<By<Option<User>, &'l user::Email>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUserSession { email, password } = cmd;

        let user = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::WrongCredentials)
            .map_err(tracerr::wrap!())?;
        if !user.password_hash.verify(password.expose_secret()) {
            return Err(tracerr::new!(E::WrongCredentials));
        }
        if !user.is_admin() {
            return Err(tracerr::new!(E::NotAdmin));
        }

        let expires_at = (DateTime::now() + self.config().session_ttl).coerce();
        let token = jsonwebtoken::encode::<Session>(
            &jsonwebtoken::Header::default(),
            &Session {
                user_id: user.id,
                email: user.email.clone(),
                role: user.role,
                name: user.name.clone(),
                expires_at,
            },
            &self.config().jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(Output {
            token,
            user,
            expires_at,
        })
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`User`] is not an administrator.
    #[display("`User` is not an administrator")]
    NotAdmin,

    /// [`CreateUserSession`] contains wrong credentials.
    #[display("Wrong `User` credentials")]
    WrongCredentials,
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        command::{AuthorizeUserSession, CreateUser},
        domain::user,
        infra::Memory,
        test_support::service,
        Command as _,
    };

    use super::{CreateUserSession, ExecutionError};

    fn password(raw: &str) -> SecretBox<user::Password> {
        SecretBox::new(Box::new(user::Password::new(raw).unwrap()))
    }

    async fn seed(svc: &crate::Service<Memory>, email: &str, role: user::Role) {
        drop(
            svc.execute(CreateUser {
                name: user::Name::new("Someone").unwrap(),
                email: user::Email::new(email).unwrap(),
                password: password("correct horse"),
                role,
            })
            .await
            .unwrap(),
        );
    }

    #[tokio::test]
    async fn issues_verifiable_token_for_admin() {
        let svc = service(Memory::new());
        seed(&svc, "admin@example.com", user::Role::Admin).await;

        let output = svc
            .execute(CreateUserSession {
                email: user::Email::new("admin@example.com").unwrap(),
                password: password("correct horse"),
            })
            .await
            .unwrap();
        let session = svc
            .execute(AuthorizeUserSession {
                token: output.token,
            })
            .await
            .unwrap();

        assert_eq!(session.user_id, output.user.id);
        assert_eq!(session.role, user::Role::Admin);
        assert_eq!(session.expires_at.unix_timestamp(), output.expires_at.unix_timestamp());
    }

    #[tokio::test]
    async fn rejects_wrong_credentials_and_non_admins() {
        let svc = service(Memory::new());
        seed(&svc, "admin@example.com", user::Role::Admin).await;
        seed(&svc, "agent@example.com", user::Role::Agent).await;

        let wrong_password = svc
            .execute(CreateUserSession {
                email: user::Email::new("admin@example.com").unwrap(),
                password: password("wrong horse"),
            })
            .await
            .unwrap_err();
        let unknown = svc
            .execute(CreateUserSession {
                email: user::Email::new("nobody@example.com").unwrap(),
                password: password("correct horse"),
            })
            .await
            .unwrap_err();
        let agent = svc
            .execute(CreateUserSession {
                email: user::Email::new("agent@example.com").unwrap(),
                password: password("correct horse"),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password.as_ref(), ExecutionError::WrongCredentials));
        assert!(matches!(unknown.as_ref(), ExecutionError::WrongCredentials));
        assert!(matches!(agent.as_ref(), ExecutionError::NotAdmin));
    }
}
