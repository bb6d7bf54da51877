//! [`Query`] collection related to a single [`Property`].

use std::collections::HashMap;

use common::operations::{By, Select};
use derive_more::From;
use tracerr::Traced;

use crate::{
    domain::{property, Property, Tag},
    infra::{database, Database},
    read::property::WithTags,
    Service,
};

use super::{properties::with_tags, Query};

/// Queries a public [`Property`] by its [`property::Slug`].
///
/// Hidden [`Property`]s are reported as missing ones.
#[derive(Clone, Debug, From)]
pub struct BySlug(pub property::Slug);

impl<Db> Query<BySlug> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<Property>, &'l property::Slug>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<property::Id, Vec<Tag>>, Vec<property::Id>>>,
            Ok = HashMap<property::Id, Vec<Tag>>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<WithTags>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        BySlug(slug): BySlug,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(property) = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(&slug)))
            .await
            .map_err(tracerr::wrap!())?
            .filter(Property::is_public)
        else {
            return Ok(None);
        };

        Ok(with_tags(self.database(), vec![property])
            .await
            .map_err(tracerr::wrap!())?
            .pop())
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        domain::property,
        infra::Memory,
        test_support::{property, service},
        Query as _,
    };

    use super::BySlug;

    fn slug(s: &str) -> property::Slug {
        property::Slug::new(s).unwrap()
    }

    #[tokio::test]
    async fn finds_public_property() {
        let db = Memory::new();
        db.insert_property(property(1, "casa", DateTime::now())).await;
        let svc = service(db);

        let found = svc.execute(BySlug(slug("casa"))).await.unwrap();

        assert_eq!(found.map(|p| p.id), Some(property::Id::from(1)));
    }

    #[tokio::test]
    async fn hides_non_public_property() {
        let db = Memory::new();
        let mut draft = property(1, "borrador", DateTime::now());
        draft.status = property::Status::Draft;
        db.insert_property(draft).await;
        let mut taken = property(2, "alquilada", DateTime::now());
        taken.is_available = false;
        db.insert_property(taken).await;
        let svc = service(db);

        for s in ["borrador", "alquilada", "inexistente"] {
            assert!(svc.execute(BySlug(slug(s))).await.unwrap().is_none(), "{s}");
        }
    }
}
