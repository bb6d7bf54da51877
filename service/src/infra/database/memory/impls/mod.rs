//! [`Database`] implementations.

mod inquiry;
mod property;
mod user;

use common::operations::{Commit, Transact};
use tracerr::Traced;

use crate::infra::{database, Database};

use super::Memory;

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        self.check()?;
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.check()
    }
}
