//! [`Command`] for counting a view of a [`Property`].

use common::{
    operations::{By, Perform},
    unit,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Property;
use crate::{
    domain::property,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for counting a view of a [`Property`].
///
/// Does nothing if there is no [`Property`] with the provided
/// [`property::Slug`].
#[derive(Clone, Debug, From)]
pub struct IncrementPropertyViews {
    /// [`property::Slug`] of the viewed [`Property`].
    pub slug: property::Slug,
}

impl<Db> Command<IncrementPropertyViews> for Service<Db>
where
    Db: for<'l> Database<
        Perform<By<unit::View, &'l property::Slug>>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: IncrementPropertyViews,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let IncrementPropertyViews { slug } = cmd;

        self.database()
            .execute(Perform(By::new(&slug)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`IncrementPropertyViews`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        domain::property,
        infra::Memory,
        query::{self, Query as _},
        test_support::{property, service},
        Command as _,
    };

    use super::IncrementPropertyViews;

    #[tokio::test]
    async fn counts_every_view() {
        let db = Memory::new();
        db.insert_property(property(1, "casa", DateTime::now())).await;
        let svc = service(db);
        let slug = property::Slug::new("casa").unwrap();

        for _ in 0..3 {
            svc.execute(IncrementPropertyViews { slug: slug.clone() })
                .await
                .unwrap();
        }

        let found = svc
            .execute(query::property::BySlug(slug))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.views_count, 3);
    }

    #[tokio::test]
    async fn ignores_unknown_slug() {
        let svc = service(Memory::new());

        svc.execute(IncrementPropertyViews {
            slug: property::Slug::new("nowhere").unwrap(),
        })
        .await
        .unwrap();
    }
}
