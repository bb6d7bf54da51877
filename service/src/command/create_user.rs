//! [`Command`] for creating a new [`User`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{Email, Name, Password, Role};
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`User`].
#[derive(Debug)]
pub struct CreateUser {
    /// [`Name`] of a new [`User`].
    pub name: user::Name,

    /// [`Email`] of a new [`User`].
    pub email: user::Email,

    /// [`Password`] of a new [`User`].
    pub password: SecretBox<user::Password>,

    /// [`Role`] of a new [`User`].
    pub role: user::Role,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<User>, &'l user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<user::New>,
            Ok = User,
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            name,
            email,
            password,
            role,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let new = user::New {
            email: email.clone(),
            name,
            password_hash: user::PasswordHash::new(password.expose_secret()),
            role,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let user = tx.execute(Insert(new)).await.map_err(|e| {
            // Lost a race with a concurrent registration.
            if e.as_ref().is_unique_violation() {
                tracerr::new!(E::EmailOccupied(email))
            } else {
                tracerr::map_from(e)
            }
        })?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::info!(user_id = %user.id, role = %user.role, "`User` created");

        Ok(user)
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`user::Email`] is already occupied.
    #[display("`{_0}` email is occupied")]
    EmailOccupied(#[error(not(source))] user::Email),
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        domain::user,
        infra::Memory,
        test_support::service,
        Command as _,
    };

    use super::{CreateUser, ExecutionError};

    fn command(email: &str) -> CreateUser {
        CreateUser {
            name: user::Name::new("Admin").unwrap(),
            email: user::Email::new(email).unwrap(),
            password: SecretBox::new(Box::new(
                user::Password::new("correct horse").unwrap(),
            )),
            role: user::Role::Admin,
        }
    }

    #[tokio::test]
    async fn creates_user_with_hashed_password() {
        let svc = service(Memory::new());

        let user = svc.execute(command("admin@example.com")).await.unwrap();

        assert!(user.is_admin());
        assert!(user
            .password_hash
            .verify(&user::Password::new("correct horse").unwrap()));
    }

    #[tokio::test]
    async fn rejects_occupied_email() {
        let svc = service(Memory::new());
        drop(svc.execute(command("admin@example.com")).await.unwrap());

        let err = svc.execute(command("admin@example.com")).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::EmailOccupied(_)));
    }
}
