//! [`Query`] collection related to multiple [`Inquiry`]s.

use common::operations::{By, Select};
use derive_more::From;
use futures::future;
use tracerr::Traced;

use crate::{
    domain::Inquiry,
    infra::{database, Database},
    read::inquiry::list,
    Service,
};

use super::Query;

/// Queries a [`list::Page`] of [`Inquiry`]s, the newest first.
#[derive(Clone, Debug, From)]
pub struct List(pub list::Selector);

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Inquiry>, list::Selector>>,
            Ok = Vec<Inquiry>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<list::TotalCount, list::Filter>>,
            Ok = list::TotalCount,
            Err = Traced<database::Error>,
        >,
{
    type Ok = list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        List(selector): List,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = selector.filter;

        let (nodes, total) = future::try_join(
            self.database()
                .execute(Select(By::<Vec<Inquiry>, _>::new(selector))),
            self.database()
                .execute(Select(By::<list::TotalCount, _>::new(filter))),
        )
        .await
        .map_err(tracerr::wrap!())?;

        Ok(list::Page::new(nodes, total.into()))
    }
}

#[cfg(test)]
mod spec {
    use common::{pagination::Arguments, DateTime};

    use crate::{
        command::{CreateInquiry, UpdateInquiry},
        domain::{inquiry, user},
        infra::Memory,
        read::inquiry::list,
        test_support::{property, service},
        Command as _,
    };

    use super::List;

    #[tokio::test]
    async fn filters_by_status_and_counts_total() {
        let db = Memory::new();
        db.insert_property(property(1, "casa", DateTime::now())).await;
        let svc = service(db);

        let mut ids = Vec::new();
        for _ in 0..3 {
            let created = svc
                .execute(CreateInquiry {
                    property_id: 1_i32.into(),
                    client_name: None,
                    client_email: user::Email::new("ana@example.com").unwrap(),
                    client_phone: None,
                    message: inquiry::Message::new("Hola").unwrap(),
                })
                .await
                .unwrap();
            ids.push(created.id);
        }
        drop(
            svc.execute(UpdateInquiry {
                id: ids[1],
                status: Some(inquiry::Status::Closed),
                note: None,
            })
            .await
            .unwrap(),
        );

        let closed = svc
            .execute(List(list::Selector {
                arguments: Arguments::new(None, None, 20).unwrap(),
                filter: list::Filter {
                    status: Some(inquiry::Status::Closed),
                },
                sort: (),
            }))
            .await
            .unwrap();
        let first = svc
            .execute(List(list::Selector {
                arguments: Arguments::first(1),
                filter: list::Filter::default(),
                sort: (),
            }))
            .await
            .unwrap();

        assert_eq!(closed.nodes.iter().map(|i| i.id).collect::<Vec<_>>(), [ids[1]]);
        assert_eq!(closed.total, 1);
        assert_eq!(first.nodes.len(), 1);
        assert_eq!(first.total, 3);
    }
}
