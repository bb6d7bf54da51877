//! [`Compare`] manager.

use std::sync::Arc;

use service::{domain::property, read::property::WithTags};
use tokio::sync::watch;
use tracerr::Traced;

#[cfg(doc)]
use service::domain::Property;

use crate::{
    storage::{Storage, StorageError},
    store::Store,
};

/// Snapshot of a [`Property`] being compared.
///
/// Stays as it was added, even if the [`Property`] changes afterwards.
pub type Snapshot = WithTags;

/// Outcome of a [`Compare`] list mutation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// [`Snapshot`] has been added.
    Added,

    /// [`Snapshot`] has been removed.
    Removed,

    /// Nothing has changed.
    Unchanged,

    /// [`Snapshot`] has not been added, as the list is full.
    Full,
}

/// Ordered list of [`Property`] [`Snapshot`]s to compare side by side.
///
/// Holds at most [`Compare::CAPACITY`] [`Snapshot`]s, each [`Property`] at
/// most once. Clones share the same state.
#[derive(Debug)]
pub struct Compare<S> {
    /// Persisted [`Snapshot`]s.
    store: Arc<Store<Vec<Snapshot>, S>>,
}

impl<S> Clone for Compare<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Storage> Compare<S> {
    /// Maximum number of [`Snapshot`]s in a [`Compare`] list.
    pub const CAPACITY: usize = 4;

    /// Key the [`Compare`] list is persisted under.
    pub const STORAGE_KEY: &'static str = "calzada_compare_list";

    /// Hydrates a [`Compare`] list from the provided [`Storage`].
    ///
    /// Malformed stored value is treated as an empty list. Repeated
    /// [`Property`]s are dropped, keeping the first [`Snapshot`] of each, and
    /// the list is cut down to [`Compare::CAPACITY`].
    #[must_use]
    pub fn load(storage: S) -> Self {
        let store = Store::load(
            storage,
            Self::STORAGE_KEY,
            |list: &Vec<Snapshot>| {
                let mut normalized = Vec::with_capacity(Self::CAPACITY);
                for snapshot in list {
                    if normalized.len() == Self::CAPACITY {
                        break;
                    }
                    if !contains(&normalized, snapshot.id) {
                        normalized.push(snapshot.clone());
                    }
                }
                (normalized.len() != list.len()).then_some(normalized)
            },
        );

        Self {
            store: Arc::new(store),
        }
    }

    /// Adds the provided [`Snapshot`] unless its [`Property`] is present
    /// already, or the list is full.
    ///
    /// # Errors
    ///
    /// If the new list cannot be persisted.
    pub fn add_to_compare(
        &self,
        snapshot: Snapshot,
    ) -> Result<Outcome, Traced<StorageError>> {
        self.store.modify(|list| {
            if contains(list, snapshot.id) {
                return (None, Outcome::Unchanged);
            }
            if list.len() >= Self::CAPACITY {
                return (None, Outcome::Full);
            }
            let mut list = list.clone();
            list.push(snapshot);
            (Some(list), Outcome::Added)
        })
    }

    /// Removes the [`Snapshot`] of the [`Property`] with the provided
    /// [`property::Id`], if any.
    ///
    /// # Errors
    ///
    /// If the new list cannot be persisted.
    pub fn remove_from_compare(
        &self,
        id: property::Id,
    ) -> Result<Outcome, Traced<StorageError>> {
        self.store.modify(|list| {
            if !contains(list, id) {
                return (None, Outcome::Unchanged);
            }
            let list = list.iter().filter(|p| p.id != id).cloned().collect();
            (Some(list), Outcome::Removed)
        })
    }

    /// Removes the [`Snapshot`] of the same [`Property`] if it's present, or
    /// adds the provided one otherwise.
    ///
    /// Removal happens regardless of the list being full.
    ///
    /// # Errors
    ///
    /// If the new list cannot be persisted.
    pub fn toggle_compare(
        &self,
        snapshot: Snapshot,
    ) -> Result<Outcome, Traced<StorageError>> {
        if self.is_in_compare(snapshot.id) {
            self.remove_from_compare(snapshot.id)
        } else {
            self.add_to_compare(snapshot)
        }
    }

    /// Indicates whether the [`Property`] with the provided [`property::Id`]
    /// is being compared.
    #[must_use]
    pub fn is_in_compare(&self, id: property::Id) -> bool {
        contains(&self.store.borrow(), id)
    }

    /// Indicates whether no more [`Snapshot`]s can be added.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count() >= Self::CAPACITY
    }

    /// Returns the number of [`Snapshot`]s being compared.
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.borrow().len()
    }

    /// Returns the [`Snapshot`]s being compared, in the order they were
    /// added.
    #[must_use]
    pub fn compare_list(&self) -> Vec<Snapshot> {
        self.store.borrow().clone()
    }

    /// Empties the list, persisting it as an empty one.
    ///
    /// # Errors
    ///
    /// If the empty list cannot be persisted.
    pub fn clear_compare(&self) -> Result<(), Traced<StorageError>> {
        self.store.modify(|_| (Some(vec![]), ()))
    }

    /// Subscribes to changes of the [`Snapshot`]s being compared.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Snapshot>> {
        self.store.subscribe()
    }
}

/// Checks whether the provided `list` contains a [`Snapshot`] of the
/// [`Property`] with the provided [`property::Id`].
fn contains(list: &[Snapshot], id: property::Id) -> bool {
    list.iter().any(|p| p.id == id)
}
