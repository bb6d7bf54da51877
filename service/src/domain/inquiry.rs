//! [`Inquiry`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::Property;
use crate::domain::{property, user};

/// Inquiry about a [`Property`] left by a client.
///
/// Immutable once created, except for its [`Status`] and notes.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    /// ID of this [`Inquiry`].
    pub id: Id,

    /// ID of the [`Property`] this [`Inquiry`] is about.
    pub property_id: property::Id,

    /// Name of the inquiring client.
    pub client_name: Option<user::Name>,

    /// Email of the inquiring client.
    pub client_email: user::Email,

    /// Phone of the inquiring client.
    pub client_phone: Option<user::Phone>,

    /// [`Message`] of the client.
    pub message: Message,

    /// [`Status`] of this [`Inquiry`].
    pub status: Status,

    /// Back-office [`Notes`] on this [`Inquiry`].
    pub notes: Option<Notes>,

    /// Indicator whether the client has been contacted.
    pub is_contacted: bool,

    /// [`DateTime`] when the client was contacted first.
    pub contacted_at: Option<ContactDateTime>,

    /// [`DateTime`] when this [`Inquiry`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Inquiry`] was last updated.
    pub updated_at: UpdateDateTime,
}

impl Inquiry {
    /// Moves this [`Inquiry`] to the provided [`Status`].
    ///
    /// Moving to [`Status::Contacted`] marks the client as contacted, keeping
    /// the [`DateTime`] of the first contact.
    pub fn set_status(&mut self, status: Status, now: common::DateTime) {
        if status == Status::Contacted && !self.is_contacted {
            self.is_contacted = true;
            self.contacted_at = Some(now.coerce());
        }
        self.status = status;
        self.updated_at = now.coerce();
    }

    /// Appends the provided [`Note`] to the [`Notes`] of this [`Inquiry`].
    pub fn append_note(&mut self, note: &Note, now: common::DateTime) {
        self.notes = Some(match self.notes.take() {
            Some(Notes(notes)) => Notes(format!("{notes}\n{note}")),
            None => Notes(note.to_string()),
        });
        self.updated_at = now.coerce();
    }
}

/// [`Inquiry`] which is not stored yet.
#[derive(Clone, Debug)]
pub struct New {
    /// ID of the [`Property`] the new [`Inquiry`] is about.
    pub property_id: property::Id,

    /// Name of the inquiring client.
    pub client_name: Option<user::Name>,

    /// Email of the inquiring client.
    pub client_email: user::Email,

    /// Phone of the inquiring client.
    pub client_phone: Option<user::Phone>,

    /// [`Message`] of the client.
    pub message: Message,

    /// [`DateTime`] when the new [`Inquiry`] is created.
    pub created_at: CreationDateTime,
}

/// ID of an [`Inquiry`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
#[serde(transparent)]
pub struct Id(i32);

define_text! {
    #[doc = "Free-text message of an [`Inquiry`]."]
    Message(max = 5000)
}

define_text! {
    #[doc = "Single back-office note on an [`Inquiry`]."]
    Note(max = 2000)
}

/// Accumulated back-office notes on an [`Inquiry`], separated by newlines.
#[derive(Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(transparent)]
pub struct Notes(String);

define_kind! {
    #[doc = "Status of an [`Inquiry`] processing."]
    enum Status {
        #[doc = "[`Inquiry`] has not been processed yet."]
        New = "new",

        #[doc = "Client has been contacted."]
        Contacted = "contacted",

        #[doc = "Client has been qualified as a potential deal."]
        Qualified = "qualified",

        #[doc = "[`Inquiry`] is closed."]
        Closed = "closed",
    }
}

/// [`DateTime`] when an [`Inquiry`] was created.
pub type CreationDateTime = DateTimeOf<(Inquiry, unit::Creation)>;

/// [`DateTime`] when an [`Inquiry`] was last updated.
pub type UpdateDateTime = DateTimeOf<(Inquiry, unit::Update)>;

/// [`DateTime`] when a client of an [`Inquiry`] was contacted.
pub type ContactDateTime = DateTimeOf<(Inquiry, unit::Contact)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use super::{Id, Inquiry, Message, Note, Status};
    use crate::domain::user;

    fn inquiry() -> Inquiry {
        Inquiry {
            id: Id::from(1),
            property_id: 7.into(),
            client_name: None,
            client_email: user::Email::new("ana@example.com").unwrap(),
            client_phone: None,
            message: Message::new("Is it still available?").unwrap(),
            status: Status::New,
            notes: None,
            is_contacted: false,
            contacted_at: None,
            created_at: DateTime::UNIX_EPOCH.coerce(),
            updated_at: DateTime::UNIX_EPOCH.coerce(),
        }
    }

    #[test]
    fn contacting_keeps_first_contact_time() {
        let first = DateTime::UNIX_EPOCH + Duration::from_secs(60);
        let second = first + Duration::from_secs(60);

        let mut inquiry = inquiry();
        inquiry.set_status(Status::Contacted, first);
        inquiry.set_status(Status::Qualified, second);
        inquiry.set_status(Status::Contacted, second);

        assert_eq!(inquiry.status, Status::Contacted);
        assert!(inquiry.is_contacted);
        assert_eq!(inquiry.contacted_at, Some(first.coerce()));
        assert_eq!(inquiry.updated_at, second.coerce());
    }

    #[test]
    fn other_statuses_do_not_mark_contacted() {
        let mut inquiry = inquiry();
        inquiry.set_status(Status::Closed, DateTime::UNIX_EPOCH);

        assert!(!inquiry.is_contacted);
        assert_eq!(inquiry.contacted_at, None);
    }

    #[test]
    fn appends_notes_line_by_line() {
        let mut inquiry = inquiry();
        inquiry.append_note(&Note::new("Called").unwrap(), DateTime::now());
        inquiry.append_note(&Note::new("Visit on Monday").unwrap(), DateTime::now());

        assert_eq!(
            inquiry.notes.map(|n| n.to_string()).as_deref(),
            Some("Called\nVisit on Monday"),
        );
    }
}
