//! [`Inquiry`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{inquiry, Inquiry},
    infra::{database, Database},
    read::inquiry::list,
};

use super::super::{Memory, State};

impl Database<Insert<inquiry::New>> for Memory {
    type Ok = Inquiry;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(new): Insert<inquiry::New>,
    ) -> Result<Self::Ok, Self::Err> {
        let inquiry::New {
            property_id,
            client_name,
            client_email,
            client_phone,
            message,
            created_at,
        } = new;

        let mut state = self.write().await?;
        let inquiry = Inquiry {
            id: State::next_id(&state.inquiries).into(),
            property_id,
            client_name,
            client_email,
            client_phone,
            message,
            status: inquiry::Status::New,
            notes: None,
            is_contacted: false,
            contacted_at: None,
            created_at,
            updated_at: created_at.coerce(),
        };
        drop(state.inquiries.insert(inquiry.id, inquiry.clone()));
        Ok(inquiry)
    }
}

impl Database<Lock<By<Inquiry, inquiry::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Inquiry, inquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Writes are serialized by the `State` lock already.
        self.check()
    }
}

impl Database<Select<By<Option<Inquiry>, inquiry::Id>>> for Memory {
    type Ok = Option<Inquiry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Inquiry>, inquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read().await?.inquiries.get(&id).cloned())
    }
}

impl Database<Update<Inquiry>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(inquiry): Update<Inquiry>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.write().await?;
        if let Some(stored) = state.inquiries.get_mut(&inquiry.id) {
            *stored = inquiry;
        }
        Ok(())
    }
}

impl Database<Select<By<Vec<Inquiry>, list::Selector>>> for Memory {
    type Ok = Vec<Inquiry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Inquiry>, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Selector {
            arguments, filter, ..
        } = by.into_inner();

        let state = self.read().await?;
        let mut matched = state
            .inquiries
            .values()
            .filter(|i| filter.matches(i))
            .collect::<Vec<_>>();
        matched.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id))
        });

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
        let count = state.inquiries.values().filter(|i| filter.matches(i));
        Ok(list::TotalCount(count.count() as u64))
    }
}
