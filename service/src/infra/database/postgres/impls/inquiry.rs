//! [`Inquiry`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{inquiry, Inquiry},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::inquiry::list,
};

use super::count;

/// Columns of the `inquiries` table read into an [`Inquiry`].
macro_rules! columns {
    () => {
        "id, property_id, \
         client_name, client_email, client_phone, \
         message, status, notes, is_contacted, contacted_at, \
         created_at, updated_at"
    };
}

/// Reads an [`Inquiry`] from the provided [`Row`] of [`columns!`].
fn from_row(row: &Row) -> Inquiry {
    Inquiry {
        id: row.get("id"),
        property_id: row.get("property_id"),
        client_name: row.get("client_name"),
        client_email: row.get("client_email"),
        client_phone: row.get("client_phone"),
        message: row.get("message"),
        status: row.get("status"),
        notes: row.get("notes"),
        is_contacted: row.get("is_contacted"),
        contacted_at: row.get("contacted_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Insert<inquiry::New>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Inquiry;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(new): Insert<inquiry::New>,
    ) -> Result<Self::Ok, Self::Err> {
        let inquiry::New {
            property_id,
            client_name,
            client_email,
            client_phone,
            message,
            created_at,
        } = new;

        const SQL: &str = concat!(
            "INSERT INTO inquiries (\
                property_id, \
                client_name, client_email, client_phone, \
                message, status, is_contacted, \
                created_at, updated_at\
            ) \
            VALUES (\
                $1::INT4, \
                $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::TEXT, 'new', FALSE, \
                $6::TIMESTAMPTZ, $6::TIMESTAMPTZ\
            ) \
            RETURNING ",
            columns!(),
        );
        let row = self
            .query(
                SQL,
                &[
                    &property_id,
                    &client_name,
                    &client_email,
                    &client_phone,
                    &message,
                    &created_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?;
        Ok(from_row(row.first().expect("`RETURNING` always yields a row")))
    }
}

impl<C> Database<Lock<By<Inquiry, inquiry::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Inquiry, inquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: inquiry::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM inquiries \
            WHERE id = $1::INT4 \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Option<Inquiry>, inquiry::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Inquiry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Inquiry>, inquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM inquiries \
              WHERE id = $1::INT4",
        );
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Update<Inquiry>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(inquiry): Update<Inquiry>,
    ) -> Result<Self::Ok, Self::Err> {
        let Inquiry {
            id,
            status,
            notes,
            is_contacted,
            contacted_at,
            updated_at,
            ..
        } = inquiry;

        const SQL: &str = "\
            UPDATE inquiries \
            SET status = $2::VARCHAR, \
                notes = $3::TEXT, \
                is_contacted = $4::BOOL, \
                contacted_at = $5::TIMESTAMPTZ, \
                updated_at = $6::TIMESTAMPTZ \
            WHERE id = $1::INT4";
        self.exec(
            SQL,
            &[
                &id,
                &status,
                &notes,
                &is_contacted,
                &contacted_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Inquiry>, list::Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Inquiry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Inquiry>, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Selector {
            arguments,
            filter: list::Filter { status },
            ..
        } = by.into_inner();

        let limit = i64::try_from(arguments.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(arguments.offset()).unwrap_or(i64::MAX);

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit, &offset];
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let sql = format!(
            "SELECT {columns} \
             FROM inquiries \
             {status_filtering} \
             ORDER BY created_at DESC, id ASC \
             LIMIT $1::INT8 OFFSET $2::INT8",
            columns = columns!(),
            status_filtering = status_idx.map_or_else(String::new, |idx| {
                format!("WHERE status = ${idx}::VARCHAR")
            }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<list::TotalCount, list::Filter>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::TotalCount, list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Filter { status } = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*) AS total \
            FROM inquiries \
            WHERE $1::VARCHAR IS NULL OR status = $1::VARCHAR";
        let row = self
            .query_opt(SQL, &[&status])
            .await
            .map_err(tracerr::wrap!())?;
        Ok(list::TotalCount(row.map_or(0, |r| count(&r, "total"))))
    }
}
