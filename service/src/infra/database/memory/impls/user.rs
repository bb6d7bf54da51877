//! [`User`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{database, Database},
};

use super::super::{Memory, State};

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read().await?.users.get(&id).cloned())
    }
}

impl<'l> Database<Select<By<Option<User>, &'l user::Email>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self
            .read()
            .await?
            .users
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }
}

impl Database<Insert<user::New>> for Memory {
    type Ok = User;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(new): Insert<user::New>,
    ) -> Result<Self::Ok, Self::Err> {
        let user::New {
            email,
            name,
            password_hash,
            role,
            created_at,
        } = new;

        let mut state = self.write().await?;
        let user = User {
            id: State::next_id(&state.users).into(),
            email,
            name,
            password_hash,
            role,
            phone: None,
            created_at,
        };
        drop(state.users.insert(user.id, user.clone()));
        Ok(user)
    }
}
