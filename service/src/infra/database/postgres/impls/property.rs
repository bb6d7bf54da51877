//! [`Property`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Perform, Select},
    unit, Price,
};
use itertools::Itertools as _;
use postgres_types::{Json, ToSql};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{property, tag, Property, Tag},
    infra::{
        database::{
            self,
            postgres::{Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read::{
        self,
        property::{list, CityCount, Stats},
    },
};

use super::{checked, checked_opt, count};

/// Columns of the `properties` table read into a [`Property`].
macro_rules! columns {
    () => {
        "id, slug, title, description, price, operation, property_type, \
         address, city, state, country, gps_location, \
         area, land_area, rooms, bathrooms, parking_spaces, floors, \
         year_built, featured_image, gallery, agent_id, status, \
         views_count, is_featured, is_available, rental_prices, \
         published_at, created_at, updated_at"
    };
}

/// Reads a [`Property`] from the provided [`Row`] of [`columns!`].
fn from_row(row: &Row) -> Property {
    Property {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        description: row.get("description"),
        price: row.get("price"),
        operation: row.get("operation"),
        kind: row.get("property_type"),
        address: row.get("address"),
        city: row.get("city"),
        state: row.get("state"),
        country: row.get("country"),
        gps_location: row.get("gps_location"),
        area: checked(row, "area"),
        land_area: checked_opt(row, "land_area"),
        rooms: checked(row, "rooms"),
        bathrooms: checked(row, "bathrooms"),
        parking_spaces: checked(row, "parking_spaces"),
        floors: checked(row, "floors"),
        year_built: checked_opt(row, "year_built"),
        featured_image: row.get("featured_image"),
        gallery: row.get::<_, Json<_>>("gallery").0,
        agent_id: row.get("agent_id"),
        status: row.get("status"),
        views_count: checked(row, "views_count"),
        is_featured: row.get("is_featured"),
        is_available: row.get("is_available"),
        rental_prices: row
            .get::<_, Option<Json<_>>>("rental_prices")
            .map(|Json(p)| p),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// SQL representation of a [`list::Filter`].
#[derive(Debug)]
struct Conditions {
    /// [`list::Filter::operation`].
    operation: Option<property::Operation>,

    /// [`list::Filter::kind`].
    kind: Option<property::Kind>,

    /// [`list::Filter::city`].
    city: Option<property::City>,

    /// [`list::Filter::search`] as a [`LikePattern`].
    search: Option<LikePattern>,

    /// [`list::Filter::min_price`].
    min_price: Option<Price>,

    /// [`list::Filter::max_price`].
    max_price: Option<Price>,

    /// [`list::Filter::min_rooms`].
    min_rooms: Option<i32>,

    /// [`list::Filter::min_bathrooms`].
    min_bathrooms: Option<i32>,

    /// [`list::Filter::rental_period`].
    rental_period: Option<property::RentalPeriod>,
}

impl From<list::Filter> for Conditions {
    fn from(filter: list::Filter) -> Self {
        let list::Filter {
            operation,
            kind,
            city,
            search,
            min_price,
            max_price,
            min_rooms,
            min_bathrooms,
            rental_period,
        } = filter;

        Self {
            operation,
            kind,
            city,
            search: search.as_deref().map(LikePattern::contains),
            min_price,
            max_price,
            min_rooms: min_rooms.map(i32::from),
            min_bathrooms: min_bathrooms.map(i32::from),
            rental_period,
        }
    }
}

impl Conditions {
    /// Renders these [`Conditions`] as an SQL boolean expression, binding
    /// their values as parameters into the provided `ps`.
    fn sql<'s>(&'s self, ps: &mut Vec<&'s (dyn ToSql + Sync)>) -> String {
        fn bind<'s>(
            ps: &mut Vec<&'s (dyn ToSql + Sync)>,
            param: &'s (dyn ToSql + Sync),
        ) -> usize {
            ps.push(param);
            ps.len()
        }

        let mut clauses =
            vec!["status = 'published'".to_owned(), "is_available".to_owned()];
        if let Some(op) = &self.operation {
            let idx = bind(ps, op);
            clauses.push(format!("operation = ${idx}::VARCHAR"));
        }
        if let Some(kind) = &self.kind {
            let idx = bind(ps, kind);
            clauses.push(format!("property_type = ${idx}::VARCHAR"));
        }
        if let Some(city) = &self.city {
            let idx = bind(ps, city);
            clauses.push(format!("city = ${idx}::VARCHAR"));
        }
        if let Some(pattern) = &self.search {
            let idx = bind(ps, pattern);
            clauses.push(format!("title ILIKE ${idx}::VARCHAR"));
        }
        if let Some(price) = &self.min_price {
            let idx = bind(ps, price);
            clauses.push(format!("price >= ${idx}::NUMERIC"));
        }
        if let Some(price) = &self.max_price {
            let idx = bind(ps, price);
            clauses.push(format!("price <= ${idx}::NUMERIC"));
        }
        if let Some(rooms) = &self.min_rooms {
            let idx = bind(ps, rooms);
            clauses.push(format!("rooms >= ${idx}::INT4"));
        }
        if let Some(bathrooms) = &self.min_bathrooms {
            let idx = bind(ps, bathrooms);
            clauses.push(format!("bathrooms >= ${idx}::INT4"));
        }
        if let Some(period) = &self.rental_period {
            let idx = bind(ps, period);
            clauses.push(format!("rental_prices ? ${idx}::VARCHAR"));
        }
        clauses.iter().format(" AND ").to_string()
    }
}

/// Renders the SQL `ORDER BY` clause of the provided [`list::Sort`].
///
/// [`property::Id`] breaks ties, so pages never overlap.
fn order_by(sort: list::Sort) -> String {
    use list::Sort as S;

    let order = sort.order().sql();
    match sort {
        S::PriceAsc | S::PriceDesc => format!("price {order}, id ASC"),
        S::Newest => format!("published_at {order} NULLS LAST, id ASC"),
        S::Views => format!("views_count {order}, id ASC"),
    }
}

impl<C> Database<Select<By<Vec<Property>, list::Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Property>, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Selector {
            arguments,
            filter,
            sort,
        } = by.into_inner();

        let limit = i64::try_from(arguments.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(arguments.offset()).unwrap_or(i64::MAX);
        let conditions = Conditions::from(filter);

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit, &offset];
        let sql = format!(
            "SELECT {columns} \
             FROM properties \
             WHERE {conditions} \
             ORDER BY {order_by} \
             LIMIT $1::INT8 OFFSET $2::INT8",
            columns = columns!(),
            conditions = conditions.sql(&mut ps),
            order_by = order_by(sort),
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
        let conditions = Conditions::from(by.into_inner());

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let sql = format!(
            "SELECT COUNT(*) AS total \
             FROM properties \
             WHERE {conditions}",
            conditions = conditions.sql(&mut ps),
        );
        let row = self
            .query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;
        Ok(list::TotalCount(row.map_or(0, |r| count(&r, "total"))))
    }
}

impl<C, IDs> Database<Select<By<HashMap<property::Id, Vec<Tag>>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[property::Id]>,
{
    type Ok = HashMap<property::Id, Vec<Tag>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<property::Id, Vec<Tag>>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[property::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT pt.property_id, t.id, t.name, t.slug \
            FROM property_tags AS pt \
            INNER JOIN tags AS t ON t.id = pt.tag_id \
            WHERE pt.property_id = ANY($1::INT4[]) \
            ORDER BY pt.property_id, t.id";
        let rows = self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?;

        let mut tags = HashMap::<_, Vec<Tag>>::new();
        for row in rows {
            tags.entry(row.get::<_, property::Id>("property_id"))
                .or_default()
                .push(Tag {
                    id: row.get::<_, tag::Id>("id"),
                    name: row.get("name"),
                    slug: row.get("slug"),
                });
        }
        Ok(tags)
    }
}

impl<C, IDs> Database<Select<By<HashMap<property::Id, Property>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[property::Id]>,
{
    type Ok = HashMap<property::Id, Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<property::Id, Property>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[property::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM properties \
              WHERE id = ANY($1::INT4[])",
        );
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let property = from_row(row);
                (property.id, property)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Property>, property::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<property::Id, Property>, [property::Id; 1]>>,
        Ok = HashMap<property::Id, Property>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<'l, C> Database<Select<By<Option<Property>, &'l property::Slug>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, &'l property::Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM properties \
              WHERE slug = $1::VARCHAR \
              LIMIT 1",
        );
        Ok(self
            .query_opt(SQL, &[slug])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<'l, C> Database<Perform<By<unit::View, &'l property::Slug>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(by): Perform<By<unit::View, &'l property::Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();

        // Incremented atomically by the database, so concurrent views are
        // never lost.
        const SQL: &str = "\
            UPDATE properties \
            SET views_count = views_count + 1 \
            WHERE slug = $1::VARCHAR";
        self.exec(SQL, &[slug])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Stats, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Stats, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*) AS total, \
                   COUNT(*) FILTER (WHERE operation = 'sale') AS for_sale, \
                   COUNT(*) FILTER (WHERE operation = 'rent') AS for_rent, \
                   ROUND(AVG(price), 2) AS avg_price, \
                   MIN(price) AS min_price, \
                   MAX(price) AS max_price \
            FROM properties \
            WHERE status = 'published'";
        let Some(row) = self
            .query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(Stats::default());
        };

        let top = i64::try_from(Stats::TOP_CITIES).unwrap_or(i64::MAX);
        const CITIES_SQL: &str = "\
            SELECT city, COUNT(*) AS count \
            FROM properties \
            WHERE status = 'published' \
            GROUP BY city \
            ORDER BY count DESC, city ASC \
            LIMIT $1::INT8";
        let cities = self
            .query(CITIES_SQL, &[&top])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|r| CityCount {
                city: r.get("city"),
                count: count(r, "count"),
            })
            .collect();

        Ok(Stats {
            total: count(&row, "total"),
            for_sale: count(&row, "for_sale"),
            for_rent: count(&row, "for_rent"),
            avg_price: row.get("avg_price"),
            min_price: row.get("min_price"),
            max_price: row.get("max_price"),
            cities,
        })
    }
}

impl<C> Database<Select<By<read::property::Slugs, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::property::Slugs;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::property::Slugs, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT slug \
            FROM properties \
            WHERE status = 'published' AND is_available \
            ORDER BY id";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| row.get::<_, property::Slug>("slug"))
            .collect::<Vec<_>>()
            .into())
    }
}

impl<C> Database<Select<By<read::Dashboard, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::Dashboard;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::Dashboard, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT (SELECT COUNT(*) FROM properties) AS total_properties, \
                   (SELECT COALESCE(SUM(views_count), 0) \
                    FROM properties)::INT8 AS total_views, \
                   (SELECT COUNT(*) FROM users WHERE role = 'admin') AS admins";
        let row = self
            .query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?;
        Ok(row.map_or_else(read::Dashboard::default, |r| read::Dashboard {
            total_properties: count(&r, "total_properties"),
            total_views: count(&r, "total_views"),
            admins: count(&r, "admins"),
        }))
    }
}
