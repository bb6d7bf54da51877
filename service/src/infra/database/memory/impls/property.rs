//! [`Property`]-related [`Database`] implementations.

use std::collections::{BTreeMap, HashMap};

use common::{
    operations::{By, Perform, Select},
    unit, Price,
};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{property, Property, Tag},
    infra::{database, Database},
    read::{
        self,
        property::{list, CityCount, Stats},
    },
};

use super::super::Memory;

impl Database<Select<By<Vec<Property>, list::Selector>>> for Memory {
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

        let state = self.read().await?;
        let mut matched = state
            .properties
            .values()
            .filter(|p| filter.matches(p))
            .collect::<Vec<_>>();
        matched.sort_by(|a, b| sort.compare(a, b));

        Ok(matched
            .into_iter()
            .skip(arguments.offset())
            .take(arguments.limit())
            .cloned()
            .collect())
    }
}

impl Database<Select<By<list::TotalCount, list::Filter>>> for Memory {
    type Ok = list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::TotalCount, list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();

        let state = self.read().await?;
        let count = state.properties.values().filter(|p| filter.matches(p));
        Ok(list::TotalCount(count.count() as u64))
    }
}

impl<IDs> Database<Select<By<HashMap<property::Id, Vec<Tag>>, IDs>>> for Memory
where
    IDs: AsRef<[property::Id]>,
{
    type Ok = HashMap<property::Id, Vec<Tag>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<property::Id, Vec<Tag>>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids: &[property::Id] = ids.as_ref();

        let state = self.read().await?;
        let mut tags = HashMap::<_, Vec<Tag>>::new();
        for (property_id, tag_id) in &state.property_tags {
            if !ids.contains(property_id) {
                continue;
            }
            if let Some(tag) = state.tags.get(tag_id) {
                tags.entry(*property_id).or_default().push(tag.clone());
            }
        }
        for list in tags.values_mut() {
            list.sort_by_key(|t| t.id);
        }
        Ok(tags)
    }
}

impl<IDs> Database<Select<By<HashMap<property::Id, Property>, IDs>>>
    for Memory
where
    IDs: AsRef<[property::Id]>,
{
    type Ok = HashMap<property::Id, Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<property::Id, Property>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();

        let state = self.read().await?;
        Ok(ids
            .as_ref()
            .iter()
            .filter_map(|id| Some((*id, state.properties.get(id)?.clone())))
            .collect())
    }
}

impl Database<Select<By<Option<Property>, property::Id>>> for Memory {
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read().await?.properties.get(&id).cloned())
    }
}

impl<'l> Database<Select<By<Option<Property>, &'l property::Slug>>>
    for Memory
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, &'l property::Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();
        Ok(self
            .read()
            .await?
            .properties
            .values()
            .find(|p| p.slug == *slug)
            .cloned())
    }
}

impl<'l> Database<Perform<By<unit::View, &'l property::Slug>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(by): Perform<By<unit::View, &'l property::Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();

        let mut state = self.write().await?;
        if let Some(p) =
            state.properties.values_mut().find(|p| p.slug == *slug)
        {
            p.views_count = p.views_count.saturating_add(1);
        }
        Ok(())
    }
}

impl Database<Select<By<Stats, ()>>> for Memory {
    type Ok = Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Stats, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.read().await?;
        let published = state
            .properties
            .values()
            .filter(|p| p.status == property::Status::Published)
            .collect::<Vec<_>>();
        if published.is_empty() {
            return Ok(Stats::default());
        }

        let count_of = |op| {
            published.iter().filter(|p| p.operation == op).count() as u64
        };
        let prices = published.iter().map(|p| p.price);
        let sum = prices.clone().map(|p| p.amount()).sum::<Decimal>();
        let avg = (sum / Decimal::from(published.len())).round_dp(2);

        let mut cities = BTreeMap::<_, u64>::new();
        for p in &published {
            *cities.entry(p.city.clone()).or_default() += 1;
        }
        let mut cities = cities
            .into_iter()
            .map(|(city, count)| CityCount { city, count })
            .collect::<Vec<_>>();
        // `BTreeMap` yields cities by name, and the sort is stable.
        cities.sort_by(|a, b| b.count.cmp(&a.count));
        cities.truncate(Stats::TOP_CITIES);

        Ok(Stats {
            total: published.len() as u64,
            for_sale: count_of(property::Operation::Sale),
            for_rent: count_of(property::Operation::Rent),
            avg_price: Price::new(avg),
            min_price: prices.clone().min(),
            max_price: prices.max(),
            cities,
        })
    }
}

impl Database<Select<By<read::property::Slugs, ()>>> for Memory {
    type Ok = read::property::Slugs;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::property::Slugs, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .read()
            .await?
            .properties
            .values()
            .filter(|p| p.is_public())
            .map(|p| p.slug.clone())
            .collect::<Vec<_>>()
            .into())
    }
}

impl Database<Select<By<read::Dashboard, ()>>> for Memory {
    type Ok = read::Dashboard;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::Dashboard, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.read().await?;
        Ok(read::Dashboard {
            total_properties: state.properties.len() as u64,
            total_views: state
                .properties
                .values()
                .map(|p| u64::from(p.views_count))
                .sum(),
            admins: state.users.values().filter(|u| u.is_admin()).count()
                as u64,
        })
    }
}
