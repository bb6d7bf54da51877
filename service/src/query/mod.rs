//! [`Query`] definition.

pub mod inquiries;
pub mod properties;
pub mod property;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    read, Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from a [`Database`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct DatabaseQuery<T>(T);

impl<W, B> DatabaseQuery<By<W, B>> {
    /// Creates a new [`DatabaseQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Db, W, B> Query<DatabaseQuery<By<W, B>>> for Service<Db>
where
    Db: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        DatabaseQuery(by): DatabaseQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Queries the back-office [`read::Dashboard`].
pub type Dashboard = DatabaseQuery<By<read::Dashboard, ()>>;

#[cfg(test)]
mod spec {
    use common::DateTime;
    use secrecy::SecretBox;

    use crate::{
        command::CreateUser,
        domain::{property, user},
        infra::Memory,
        read,
        test_support::{property, service},
        Command as _,
    };

    use super::{Dashboard, Query as _};

    #[tokio::test]
    async fn dashboard_counts_everything() {
        let db = Memory::new();
        let mut viewed = property(1, "casa", DateTime::now());
        viewed.views_count = 5;
        let mut draft = property(2, "depto", DateTime::now());
        draft.status = property::Status::Draft;
        draft.views_count = 2;
        db.insert_property(viewed).await;
        db.insert_property(draft).await;
        let svc = service(db);
        drop(
            svc.execute(CreateUser {
                name: user::Name::new("Admin").unwrap(),
                email: user::Email::new("admin@example.com").unwrap(),
                password: SecretBox::new(Box::new(
                    user::Password::new("correct horse").unwrap(),
                )),
                role: user::Role::Admin,
            })
            .await
            .unwrap(),
        );

        let dashboard = svc.execute(Dashboard::by(())).await.unwrap();

        assert_eq!(
            dashboard,
            read::Dashboard {
                total_properties: 2,
                total_views: 7,
                admins: 1,
            },
        );
    }
}
