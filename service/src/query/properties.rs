//! [`Query`] collection related to the multiple [`Property`]s.
//!
//! Every [`Query`] here returns public [`Property`]s only, enriched with their
//! [`Tag`]s fetched in a single batched lookup.

use std::collections::{HashMap, HashSet};

use common::{
    operations::{By, Select},
    pagination::Arguments,
};
use derive_more::From;
use futures::future;
use tracerr::Traced;

use crate::{
    domain::{property, Property, Tag},
    infra::{database, Database},
    read::{
        self,
        property::{list, WithTags},
    },
    Service,
};

use super::{DatabaseQuery, Query};

/// [`Tag`]s of multiple [`Property`]s.
type TagsByProperty = HashMap<property::Id, Vec<Tag>>;

/// Enriches the provided [`Property`]s with their [`Tag`]s, preserving the
/// order.
pub(crate) async fn with_tags<Db>(
    db: &Db,
    properties: Vec<Property>,
) -> Result<Vec<WithTags>, Traced<database::Error>>
where
    Db: Database<
        Select<By<TagsByProperty, Vec<property::Id>>>,
        Ok = TagsByProperty,
        Err = Traced<database::Error>,
    >,
{
    if properties.is_empty() {
        return Ok(vec![]);
    }

    let ids = properties.iter().map(|p| p.id).collect::<Vec<_>>();
    let mut tags = db
        .execute(Select(By::new(ids)))
        .await
        .map_err(tracerr::wrap!())?;

    Ok(properties
        .into_iter()
        .map(|property| WithTags {
            tags: tags.remove(&property.id).unwrap_or_default(),
            property,
        })
        .collect())
}

/// Queries a [`list::Page`] of public [`Property`]s.
///
/// The [`list::Page::total`] counts all the [`Property`]s matching the same
/// [`list::Filter`], regardless of pagination.
#[derive(Clone, Debug, From)]
pub struct List(pub list::Selector);

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Property>, list::Selector>>,
            Ok = Vec<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<list::TotalCount, list::Filter>>,
            Ok = list::TotalCount,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<TagsByProperty, Vec<property::Id>>>,
            Ok = TagsByProperty,
            Err = Traced<database::Error>,
        >,
{
    type Ok = list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        List(selector): List,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = selector.filter.clone();

        let (properties, total) = future::try_join(
            self.database()
                .execute(Select(By::<Vec<Property>, _>::new(selector))),
            self.database()
                .execute(Select(By::<list::TotalCount, _>::new(filter))),
        )
        .await
        .map_err(tracerr::wrap!())?;

        let nodes = with_tags(self.database(), properties)
            .await
            .map_err(tracerr::wrap!())?;

        Ok(list::Page::new(nodes, total.into()))
    }
}

/// Queries highlighted [`Property`]s for the front page.
///
/// Samples the newest public [`Property`]s. If enough of them are featured,
/// only the featured ones are returned. Otherwise the featured ones go first,
/// padded with the rest of the sample.
#[derive(Clone, Copy, Debug, Default)]
pub struct Featured;

impl Featured {
    /// Size of the sample.
    pub const LIMIT: usize = 6;

    /// Minimal number of featured [`Property`]s to return them exclusively.
    pub const MIN_FEATURED: usize = 3;
}

impl<Db> Query<Featured> for Service<Db>
where
    Self: Query<List, Ok = list::Page, Err = Traced<database::Error>>,
{
    type Ok = Vec<WithTags>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Featured) -> Result<Self::Ok, Self::Err> {
        let sample = self
            .execute(List(list::Selector {
                arguments: Arguments::first(Featured::LIMIT),
                filter: list::Filter::default(),
                sort: list::Sort::Newest,
            }))
            .await
            .map_err(tracerr::wrap!())?
            .nodes;

        let (mut featured, rest): (Vec<_>, Vec<_>) =
            sample.into_iter().partition(|p| p.is_featured);
        if featured.len() < Featured::MIN_FEATURED {
            featured.extend(rest);
        }
        featured.truncate(Featured::LIMIT);

        Ok(featured)
    }
}

/// Queries public [`Property`]s in the same [`property::City`] as the given
/// one, excluding it.
#[derive(Clone, Debug)]
pub struct Related {
    /// ID of the [`Property`] to exclude.
    pub id: property::Id,

    /// [`property::City`] to look in.
    pub city: property::City,

    /// Maximum number of [`Property`]s to return.
    pub limit: usize,
}

impl Related {
    /// Default [`Related::limit`].
    pub const DEFAULT_LIMIT: usize = 3;

    /// Creates a new [`Related`] [`Query`] with the [`Related::DEFAULT_LIMIT`].
    #[must_use]
    pub const fn new(id: property::Id, city: property::City) -> Self {
        Self {
            id,
            city,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

impl<Db> Query<Related> for Service<Db>
where
    Self: Query<List, Ok = list::Page, Err = Traced<database::Error>>,
{
    type Ok = Vec<WithTags>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Related { id, city, limit }: Related,
    ) -> Result<Self::Ok, Self::Err> {
        // One extra, so excluding the given `Property` doesn't under-fill.
        let page = self
            .execute(List(list::Selector {
                arguments: Arguments::first(limit.saturating_add(1)),
                filter: list::Filter {
                    city: Some(city),
                    ..list::Filter::default()
                },
                sort: list::Sort::Newest,
            }))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(page
            .nodes
            .into_iter()
            .filter(|p| p.id != id)
            .take(limit)
            .collect())
    }
}

/// Queries public [`Property`]s by their [`property::Id`]s.
///
/// The requested order is preserved, duplicates are ignored.
#[derive(Clone, Debug, From)]
pub struct ByIds(pub Vec<property::Id>);

impl<Db> Query<ByIds> for Service<Db>
where
    Db: Database<
            Select<By<HashMap<property::Id, Property>, Vec<property::Id>>>,
            Ok = HashMap<property::Id, Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<TagsByProperty, Vec<property::Id>>>,
            Ok = TagsByProperty,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<WithTags>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ByIds(mut ids): ByIds,
    ) -> Result<Self::Ok, Self::Err> {
        let mut seen = HashSet::new();
        ids.retain(|id| seen.insert(*id));
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut found = self
            .database()
            .execute(Select(By::<HashMap<property::Id, Property>, _>::new(
                ids.clone(),
            )))
            .await
            .map_err(tracerr::wrap!())?;
        let properties = ids
            .into_iter()
            .filter_map(|id| found.remove(&id))
            .filter(Property::is_public)
            .collect();

        with_tags(self.database(), properties)
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Queries [`read::property::Stats`] of the published [`Property`]s.
pub type Stats = DatabaseQuery<By<read::property::Stats, ()>>;

/// Queries [`read::property::Slugs`] of the public [`Property`]s.
pub type Slugs = DatabaseQuery<By<read::property::Slugs, ()>>;

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use common::{pagination::Arguments, DateTime, Price};

    use crate::{
        domain::{property, tag, Tag},
        infra::Memory,
        read::property::list,
        test_support::{minutes, property, service},
        Query as _,
    };

    use super::{ByIds, Featured, List, Related, Slugs, Stats};

    fn selector(filter: list::Filter, sort: list::Sort) -> list::Selector {
        list::Selector {
            arguments: Arguments::new(None, None, 50).unwrap(),
            filter,
            sort,
        }
    }

    fn ids(nodes: &[crate::read::property::WithTags]) -> Vec<i32> {
        nodes.iter().map(|p| p.id.into()).collect()
    }

    /// Catalog with a mix of public and hidden [`Property`]s.
    async fn catalog() -> Memory {
        let db = Memory::new();

        for id in 1..=10 {
            let mut p = property(id, &format!("casa-{id}"), minutes(id as u64));
            p.price = Price::from(50_000 * (id as u32 % 4 + 1));
            p.rooms = (id % 5) as u16;
            p.operation = if id % 2 == 0 {
                property::Operation::Rent
            } else {
                property::Operation::Sale
            };
            match id {
                3 => p.status = property::Status::Draft,
                6 => p.is_available = false,
                9 => p.status = property::Status::Sold,
                _ => {}
            }
            db.insert_property(p).await;
        }
        db
    }

    #[tokio::test]
    async fn returns_only_public_matching_properties() {
        let svc = service(catalog().await);

        let filter = list::Filter {
            operation: Some(property::Operation::Sale),
            min_rooms: Some(1),
            ..list::Filter::default()
        };
        let page = svc
            .execute(List(selector(filter.clone(), list::Sort::Newest)))
            .await
            .unwrap();

        assert!(!page.nodes.is_empty());
        for p in &page.nodes {
            assert!(p.is_public());
            assert!(filter.matches(p));
        }
        assert_eq!(ids(&page.nodes), vec![7, 1]);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn total_ignores_pagination() {
        let svc = service(catalog().await);

        let page = svc
            .execute(List(list::Selector {
                arguments: Arguments::new(Some(2), Some(1), 50).unwrap(),
                filter: list::Filter::default(),
                sort: list::Sort::Newest,
            }))
            .await
            .unwrap();

        assert_eq!(page.nodes.len(), 2);
        assert_eq!(page.total, 7);
    }

    #[tokio::test]
    async fn pages_neither_overlap_nor_skip() {
        let db = Memory::new();
        for id in 1..=9 {
            // Same price everywhere, so only the tie-break orders them.
            db.insert_property(property(id, &format!("casa-{id}"), minutes(1)))
                .await;
        }
        let svc = service(db);

        for sort in list::Sort::ALL {
            let mut seen = Vec::new();
            for offset in (0..9).step_by(4) {
                let page = svc
                    .execute(List(list::Selector {
                        arguments: Arguments::new(Some(4), Some(offset), 50)
                            .unwrap(),
                        filter: list::Filter::default(),
                        sort: *sort,
                    }))
                    .await
                    .unwrap();
                seen.extend(ids(&page.nodes));
            }

            assert_eq!(seen, (1..=9).collect::<Vec<_>>(), "{sort}");
        }
    }

    #[tokio::test]
    async fn sorts_by_price() {
        let svc = service(catalog().await);

        let page = svc
            .execute(List(selector(list::Filter::default(), list::Sort::PriceAsc)))
            .await
            .unwrap();

        let prices = page.nodes.iter().map(|p| p.price).collect::<Vec<_>>();
        let mut sorted = prices.clone();
        sorted.sort();
        assert_eq!(prices, sorted);
        // Ties are broken by ID ascending.
        assert_eq!(ids(&page.nodes), vec![4, 8, 1, 5, 2, 10, 7]);
    }

    #[tokio::test]
    async fn filters_by_price_bounds() {
        let db = Memory::new();
        db.insert_property(property(1, "casa", DateTime::now())).await;
        let svc = service(db);

        let within = list::Filter {
            min_price: Some("50000".parse().unwrap()),
            max_price: Some("150000".parse().unwrap()),
            ..list::Filter::default()
        };
        let above = list::Filter {
            min_price: Some("150001".parse().unwrap()),
            ..list::Filter::default()
        };

        let found = svc
            .execute(List(selector(within, list::Sort::Newest)))
            .await
            .unwrap();
        let missed = svc
            .execute(List(selector(above, list::Sort::Newest)))
            .await
            .unwrap();

        assert_eq!(ids(&found.nodes), vec![1]);
        assert!(missed.nodes.is_empty());
        assert_eq!(missed.total, 0);
    }

    #[tokio::test]
    async fn searches_title_case_insensitively() {
        let svc = service(catalog().await);

        let filter = list::Filter {
            search: Some("PROPIEDAD CASA-1".into()),
            ..list::Filter::default()
        };
        let page = svc
            .execute(List(selector(filter, list::Sort::Newest)))
            .await
            .unwrap();

        assert_eq!(ids(&page.nodes), vec![10, 1]);
    }

    #[tokio::test]
    async fn filters_by_rental_period() {
        let db = Memory::new();
        let mut monthly = property(1, "casa-1", minutes(1));
        monthly.operation = property::Operation::Rent;
        monthly.rental_prices = Some(property::RentalPrices::from([(
            property::RentalPeriod::Monthly,
            Price::from(1_000),
        )]));
        db.insert_property(monthly).await;
        db.insert_property(property(2, "casa-2", minutes(2))).await;
        let svc = service(db);

        let by = |period| list::Filter {
            rental_period: Some(period),
            ..list::Filter::default()
        };
        let found = svc
            .execute(List(selector(
                by(property::RentalPeriod::Monthly),
                list::Sort::Newest,
            )))
            .await
            .unwrap();
        let missed = svc
            .execute(List(selector(
                by(property::RentalPeriod::Daily),
                list::Sort::Newest,
            )))
            .await
            .unwrap();

        assert_eq!(ids(&found.nodes), vec![1]);
        assert_eq!(found.total, 1);
        assert!(missed.nodes.is_empty());
    }

    #[tokio::test]
    async fn attaches_tags_in_batch() {
        let db = Memory::new();
        db.insert_property(property(1, "casa", minutes(1))).await;
        db.insert_property(property(2, "depto", minutes(2))).await;
        for (id, name) in [(1_i32, "pileta"), (2, "jardin")] {
            db.insert_tag(Tag {
                id: id.into(),
                name: tag::Name::new(name).unwrap(),
                slug: tag::Slug::new(name).unwrap(),
            })
            .await;
        }
        db.tag_property(property::Id::from(1), tag::Id::from(2)).await;
        db.tag_property(property::Id::from(1), tag::Id::from(1))
            .await;
        let svc = service(db);

        let page = svc
            .execute(List(selector(list::Filter::default(), list::Sort::Newest)))
            .await
            .unwrap();

        assert_eq!(ids(&page.nodes), vec![2, 1]);
        assert!(page.nodes[0].tags.is_empty());
        let tags = page.nodes[1]
            .tags
            .iter()
            .map(|t| t.name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(tags, ["pileta", "jardin"]);
    }

    #[tokio::test]
    async fn fails_when_database_is_unavailable() {
        let db = catalog().await;
        db.set_unavailable(true);
        let svc = service(db);

        assert!(svc
            .execute(List(selector(list::Filter::default(), list::Sort::Newest)))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn featured_falls_back_to_newest() {
        let db = Memory::new();
        for id in 1..=8 {
            db.insert_property(property(id, &format!("casa-{id}"), minutes(id as u64)))
                .await;
        }
        let svc = service(db);

        let featured = svc.execute(Featured).await.unwrap();

        assert_eq!(ids(&featured), vec![8, 7, 6, 5, 4, 3]);
    }

    #[tokio::test]
    async fn featured_prefers_featured_ones() {
        let db = Memory::new();
        for id in 1..=8 {
            let mut p = property(id, &format!("casa-{id}"), minutes(id as u64));
            p.is_featured = [4, 6, 7].contains(&id);
            db.insert_property(p).await;
        }
        let svc = service(db);

        let featured = svc.execute(Featured).await.unwrap();

        assert_eq!(ids(&featured), vec![7, 6, 4]);
    }

    #[tokio::test]
    async fn featured_pads_few_featured_ones() {
        let db = Memory::new();
        for id in 1..=8 {
            let mut p = property(id, &format!("casa-{id}"), minutes(id as u64));
            p.is_featured = id == 5;
            db.insert_property(p).await;
        }
        let svc = service(db);

        let featured = svc.execute(Featured).await.unwrap();

        assert_eq!(ids(&featured), vec![5, 8, 7, 6, 4, 3]);
    }

    #[tokio::test]
    async fn related_never_includes_itself() {
        let db = Memory::new();
        for id in 1..=5 {
            db.insert_property(property(id, &format!("casa-{id}"), minutes(id as u64)))
                .await;
        }
        let svc = service(db);

        let related = svc
            .execute(Related::new(property::Id::from(5), property::City::new("Palermo").unwrap()))
            .await
            .unwrap();

        assert_eq!(ids(&related), vec![4, 3, 2]);
    }

    #[tokio::test]
    async fn related_stays_in_the_city() {
        let db = Memory::new();
        for id in 1..=4 {
            let mut p = property(id, &format!("casa-{id}"), minutes(id as u64));
            if id % 2 == 0 {
                p.city = property::City::new("Belgrano").unwrap();
            }
            db.insert_property(p).await;
        }
        let svc = service(db);

        let related = svc
            .execute(Related::new(property::Id::from(1), property::City::new("Palermo").unwrap()))
            .await
            .unwrap();

        assert_eq!(ids(&related), vec![3]);
    }

    #[tokio::test]
    async fn by_ids_keeps_order_and_skips_hidden() {
        let svc = service(catalog().await);

        let found = svc
            .execute(ByIds(
                [5, 3, 1, 5, 42, 6, 2].map(property::Id::from).to_vec(),
            ))
            .await
            .unwrap();

        assert_eq!(ids(&found), vec![5, 1, 2]);
        assert!(svc.execute(ByIds(vec![])).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn counts_stats_and_slugs() {
        let svc = service(catalog().await);

        let stats = svc.execute(Stats::by(())).await.unwrap();
        let crate::read::property::Stats {
            total,
            for_sale,
            for_rent,
            min_price,
            max_price,
            cities,
            ..
        } = stats;
        let slugs = svc.execute(Slugs::by(())).await.unwrap();

        // Unavailable ones are still published.
        assert_eq!(total, 8);
        assert_eq!(for_sale + for_rent, total);
        assert_eq!(min_price, Some(Price::from(50_000)));
        assert_eq!(max_price, Some(Price::from(200_000)));
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].count, 8);
        assert_eq!(
            slugs.0.iter().map(ToString::to_string).collect::<HashSet<_>>(),
            [1, 2, 4, 5, 7, 8, 10]
                .map(|id| format!("casa-{id}"))
                .into_iter()
                .collect(),
        );
    }
}
