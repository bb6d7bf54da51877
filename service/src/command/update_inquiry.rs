//! [`Command`] for updating an [`Inquiry`] by the back-office.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{inquiry, Inquiry},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an [`Inquiry`] by the back-office.
///
/// Only the [`inquiry::Status`] and the notes of an [`Inquiry`] are mutable.
#[derive(Clone, Debug)]
pub struct UpdateInquiry {
    /// ID of the [`Inquiry`] to update.
    pub id: inquiry::Id,

    /// New [`inquiry::Status`] of the [`Inquiry`], if any.
    pub status: Option<inquiry::Status>,

    /// [`inquiry::Note`] to append to the [`Inquiry`], if any.
    pub note: Option<inquiry::Note>,
}

impl<Db> Command<UpdateInquiry> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Inquiry>, inquiry::Id>>,
            Ok = Option<Inquiry>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Inquiry, inquiry::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Inquiry>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Inquiry;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateInquiry) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateInquiry { id, status, note } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Inquiry`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut inquiry = tx
            .execute(Select(By::<Option<Inquiry>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InquiryNotExists(id))
            .map_err(tracerr::wrap!())?;
        if status.is_none() && note.is_none() {
            return Ok(inquiry);
        }

        let now = DateTime::now();
        if let Some(status) = status {
            inquiry.set_status(status, now);
        }
        if let Some(note) = &note {
            inquiry.append_note(note, now);
        }

        tx.execute(Update(inquiry.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::debug!(inquiry_id = %id, status = %inquiry.status, "`Inquiry` updated");

        Ok(inquiry)
    }
}

/// Error of [`UpdateInquiry`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Inquiry`] doesn't exist.
    #[display("`Inquiry(id: {_0})` does not exist")]
    #[from(ignore)]
    InquiryNotExists(#[error(not(source))] inquiry::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        command::CreateInquiry,
        domain::{inquiry, user},
        infra::Memory,
        test_support::{property, service},
        Command as _,
    };

    use super::{ExecutionError, UpdateInquiry};

    #[tokio::test]
    async fn marks_contacted_and_appends_notes() {
        let db = Memory::new();
        db.insert_property(property(1, "casa", DateTime::now())).await;
        let svc = service(db);
        let created = svc
            .execute(CreateInquiry {
                property_id: 1.into(),
                client_name: None,
                client_email: user::Email::new("ana@example.com").unwrap(),
                client_phone: None,
                message: inquiry::Message::new("Hola").unwrap(),
            })
            .await
            .unwrap();

        let first = svc
            .execute(UpdateInquiry {
                id: created.id,
                status: Some(inquiry::Status::Contacted),
                note: Some(inquiry::Note::new("Called").unwrap()),
            })
            .await
            .unwrap();
        let second = svc
            .execute(UpdateInquiry {
                id: created.id,
                status: Some(inquiry::Status::Qualified),
                note: Some(inquiry::Note::new("Visit on Monday").unwrap()),
            })
            .await
            .unwrap();

        assert!(first.is_contacted);
        assert_eq!(second.status, inquiry::Status::Qualified);
        assert!(second.is_contacted);
        assert_eq!(second.contacted_at, first.contacted_at);
        assert_eq!(
            second.notes.map(|n| n.to_string()).as_deref(),
            Some("Called\nVisit on Monday"),
        );
        assert_eq!(second.message, created.message);
        assert_eq!(second.created_at, created.created_at);
    }

    #[tokio::test]
    async fn fails_on_missing_inquiry() {
        let svc = service(Memory::new());

        let err = svc
            .execute(UpdateInquiry {
                id: 42.into(),
                status: Some(inquiry::Status::Closed),
                note: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::InquiryNotExists(_)));
    }
}
