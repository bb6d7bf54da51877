//! [`Command`] for creating a new [`Inquiry`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{inquiry, property, user, Inquiry, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Inquiry`] about a public [`Property`].
#[derive(Clone, Debug)]
pub struct CreateInquiry {
    /// ID of the [`Property`] the [`Inquiry`] is about.
    pub property_id: property::Id,

    /// Name of the inquiring client.
    pub client_name: Option<user::Name>,

    /// Email of the inquiring client.
    pub client_email: user::Email,

    /// Phone of the inquiring client.
    pub client_phone: Option<user::Phone>,

    /// [`inquiry::Message`] of the client.
    pub message: inquiry::Message,
}

impl<Db> Command<CreateInquiry> for Service<Db>
where
    Db: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<inquiry::New>,
            Ok = Inquiry,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Inquiry;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateInquiry,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateInquiry {
            property_id,
            client_name,
            client_email,
            client_phone,
            message,
        } = cmd;

        // Only publicly visible `Property`s can be inquired about.
        drop(
            self.database()
                .execute(Select(By::<Option<Property>, _>::new(property_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .filter(Property::is_public)
                .ok_or(E::PropertyNotExists(property_id))
                .map_err(tracerr::wrap!())?,
        );

        let inquiry = self
            .database()
            .execute(Insert(inquiry::New {
                property_id,
                client_name,
                client_email,
                client_phone,
                message,
                created_at: DateTime::now().coerce(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::info!(
            inquiry_id = %inquiry.id,
            property_id = %property_id,
            "`Inquiry` created",
        );

        Ok(inquiry)
    }
}

/// Error of [`CreateInquiry`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Property`] doesn't exist or is not public.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        domain::{inquiry, property, user},
        infra::Memory,
        test_support::{property, service},
        Command as _,
    };

    use super::{CreateInquiry, ExecutionError};

    fn command(property_id: i32) -> CreateInquiry {
        CreateInquiry {
            property_id: property_id.into(),
            client_name: user::Name::new("Ana"),
            client_email: user::Email::new("ana@example.com").unwrap(),
            client_phone: None,
            message: inquiry::Message::new("Is it still available?").unwrap(),
        }
    }

    #[tokio::test]
    async fn creates_new_inquiry() {
        let db = Memory::new();
        db.insert_property(property(1, "casa", DateTime::now())).await;
        let svc = service(db);

        let inquiry = svc.execute(command(1)).await.unwrap();

        assert_eq!(inquiry.property_id, property::Id::from(1));
        assert_eq!(inquiry.status, inquiry::Status::New);
        assert!(!inquiry.is_contacted);
        assert_eq!(inquiry.notes, None);
    }

    #[tokio::test]
    async fn rejects_hidden_or_missing_property() {
        let db = Memory::new();
        let mut draft = property(1, "casa", DateTime::now());
        draft.status = property::Status::Draft;
        db.insert_property(draft).await;
        let svc = service(db);

        for id in [1, 2] {
            let err = svc.execute(command(id)).await.unwrap_err();
            assert!(matches!(
                err.as_ref(),
                ExecutionError::PropertyNotExists(_),
            ));
        }
    }
}
