//! In-memory [`Database`] implementation.
//!
//! Mirrors the semantics of the [`Postgres`] one, so the business logic can be
//! exercised without a running database.
//!
//! [`Postgres`]: super::Postgres

mod impls;

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use derive_more::{Display, Error as StdError};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracerr::Traced;

#[cfg(doc)]
use crate::infra::Database;
use crate::{
    domain::{inquiry, property, tag, user, Inquiry, Property, Tag, User},
    infra::database,
};

/// In-memory [`Database`] client.
///
/// Clones share the same underlying state.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Stored data.
    state: Arc<RwLock<State>>,

    /// Indicator whether this [`Memory`] pretends to be unreachable.
    unavailable: Arc<AtomicBool>,
}

/// Data stored in a [`Memory`] client.
#[derive(Debug, Default)]
struct State {
    /// Stored [`Property`]s.
    properties: BTreeMap<property::Id, Property>,

    /// Stored [`Tag`]s.
    tags: BTreeMap<tag::Id, Tag>,

    /// Associations between [`Property`]s and [`Tag`]s.
    property_tags: Vec<(property::Id, tag::Id)>,

    /// Stored [`User`]s.
    users: BTreeMap<user::Id, User>,

    /// Stored [`Inquiry`]s.
    inquiries: BTreeMap<inquiry::Id, Inquiry>,
}

impl State {
    /// Returns the next free serial ID in the provided `table`.
    fn next_id<K, V>(table: &BTreeMap<K, V>) -> i32
    where
        K: Copy + Into<i32> + Ord,
    {
        table
            .last_key_value()
            .map_or(1, |(id, _)| (*id).into().saturating_add(1))
    }
}

impl Memory {
    /// Creates a new empty [`Memory`] client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following operation fail with [`Error::Unavailable`] (or
    /// succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Stores the provided [`Property`], replacing the one with the same ID.
    pub async fn insert_property(&self, property: Property) {
        drop(self.state.write().await.properties.insert(property.id, property));
    }

    /// Stores the provided [`Tag`], replacing the one with the same ID.
    pub async fn insert_tag(&self, tag: Tag) {
        drop(self.state.write().await.tags.insert(tag.id, tag));
    }

    /// Associates the provided [`Tag`] with the provided [`Property`].
    pub async fn tag_property(&self, property_id: property::Id, tag_id: tag::Id) {
        let mut state = self.state.write().await;
        if !state.property_tags.contains(&(property_id, tag_id)) {
            state.property_tags.push((property_id, tag_id));
        }
    }

    /// Acquires a read access to the stored [`State`].
    async fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, State>, Traced<database::Error>> {
        self.check()?;
        Ok(self.state.read().await)
    }

    /// Acquires a write access to the stored [`State`].
    async fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, State>, Traced<database::Error>> {
        self.check()?;
        Ok(self.state.write().await)
    }

    /// Checks whether this [`Memory`] is reachable.
    fn check(&self) -> Result<(), Traced<database::Error>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(tracerr::map_from(tracerr::new!(Error::Unavailable)));
        }
        Ok(())
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Memory`] is switched to be unreachable.
    #[display("`Memory` database is unavailable")]
    Unavailable,
}
