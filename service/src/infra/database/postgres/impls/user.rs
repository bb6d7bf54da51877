//! [`User`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Reads a [`User`] from the provided [`Row`].
fn from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        role: row.get("role"),
        phone: row.get("phone"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<User>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, email, name, password_hash, role, phone, created_at \
            FROM users \
            WHERE id = $1::INT4";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<'l, C> Database<Select<By<Option<User>, &'l user::Email>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();

        const SQL: &str = "\
            SELECT id, email, name, password_hash, role, phone, created_at \
            FROM users \
            WHERE email = $1::VARCHAR \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[email])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Insert<user::New>> for Postgres<C>
where
    C: Connection,
{
    type Ok = User;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(new): Insert<user::New>,
    ) -> Result<Self::Ok, Self::Err> {
        let user::New {
            email,
            name,
            password_hash,
            role,
            created_at,
        } = new;

        const SQL: &str = "\
            INSERT INTO users (\
                email, name, password_hash, role, created_at, updated_at\
            ) \
            VALUES (\
                $1::VARCHAR, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::TIMESTAMPTZ, $5::TIMESTAMPTZ\
            ) \
            RETURNING id, email, name, password_hash, role, phone, created_at";
        let rows = self
            .query(SQL, &[&email, &name, &password_hash, &role, &created_at])
            .await
            .map_err(tracerr::wrap!())?;
        Ok(from_row(rows.first().expect("`RETURNING` always yields a row")))
    }
}
