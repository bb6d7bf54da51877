//! [`Favorites`] manager.

use std::sync::Arc;

use service::domain::property;
use tokio::sync::watch;
use tracerr::Traced;

#[cfg(doc)]
use service::domain::Property;

use crate::{
    storage::{Storage, StorageError},
    store::Store,
};

/// Unbounded set of favorite [`Property`]s, kept in insertion order.
///
/// Clones share the same state, so a change made through one of them is
/// observed by all the others.
#[derive(Debug)]
pub struct Favorites<S> {
    /// Persisted [`property::Id`]s.
    store: Arc<Store<Vec<property::Id>, S>>,
}

impl<S> Clone for Favorites<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Storage> Favorites<S> {
    /// Key the [`Favorites`] are persisted under.
    pub const STORAGE_KEY: &'static str = "calzada-favorites";

    /// Hydrates [`Favorites`] from the provided [`Storage`].
    ///
    /// Malformed stored value is treated as an empty set.
    #[must_use]
    pub fn load(storage: S) -> Self {
        // Tolerate duplicates left by other writers.
        let store = Store::load(
            storage,
            Self::STORAGE_KEY,
            |ids: &Vec<property::Id>| {
                let mut unique = Vec::with_capacity(ids.len());
                for id in ids {
                    if !unique.contains(id) {
                        unique.push(*id);
                    }
                }
                (unique.len() != ids.len()).then_some(unique)
            },
        );

        Self {
            store: Arc::new(store),
        }
    }

    /// Adds the provided [`property::Id`] if it's absent, or removes it
    /// otherwise.
    ///
    /// Returns whether the [`Property`] is a favorite one afterwards.
    ///
    /// # Errors
    ///
    /// If the new set cannot be persisted.
    pub fn toggle(
        &self,
        id: property::Id,
    ) -> Result<bool, Traced<StorageError>> {
        self.store.modify(|ids| {
            let mut ids = ids.clone();
            let added = if let Some(pos) = ids.iter().position(|i| *i == id) {
                _ = ids.remove(pos);
                false
            } else {
                ids.push(id);
                true
            };
            (Some(ids), added)
        })
    }

    /// Indicates whether the provided [`property::Id`] is a favorite one.
    #[must_use]
    pub fn is_favorite(&self, id: property::Id) -> bool {
        self.store.borrow().contains(&id)
    }

    /// Returns the number of favorite [`Property`]s.
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.borrow().len()
    }

    /// Returns the favorite [`property::Id`]s in insertion order.
    #[must_use]
    pub fn favorites(&self) -> Vec<property::Id> {
        self.store.borrow().clone()
    }

    /// Empties the set, removing it from the [`Storage`].
    ///
    /// # Errors
    ///
    /// If the persisted set cannot be removed.
    pub fn clear(&self) -> Result<(), Traced<StorageError>> {
        self.store.remove()
    }

    /// Subscribes to changes of the favorite [`property::Id`]s.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<property::Id>> {
        self.store.subscribe()
    }
}

#[cfg(test)]
mod spec {
    use std::io;

    use service::domain::property;
    use tracerr::Traced;

    use crate::storage::{MemoryStorage, Storage, StorageError};

    use super::Favorites;

    fn id(id: i32) -> property::Id {
        property::Id::from(id)
    }

    fn persisted(storage: &MemoryStorage) -> Option<Vec<property::Id>> {
        storage
            .get(Favorites::<MemoryStorage>::STORAGE_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[test]
    fn toggles_back_and_forth() {
        let storage = MemoryStorage::new();
        let favorites = Favorites::load(storage.clone());
        _ = favorites.toggle(id(1)).unwrap();
        let before = favorites.favorites();

        assert!(favorites.toggle(id(5)).unwrap());
        assert!(favorites.is_favorite(id(5)));
        assert!(!favorites.toggle(id(5)).unwrap());

        assert!(!favorites.is_favorite(id(5)));
        assert_eq!(favorites.favorites(), before);
        assert_eq!(persisted(&storage), Some(before));
    }

    #[test]
    fn count_matches_persisted_set() {
        let storage = MemoryStorage::new();
        let favorites = Favorites::load(storage.clone());

        for i in [3, 1, 3, 2, 7, 1, 3] {
            _ = favorites.toggle(id(i)).unwrap();
            assert_eq!(
                Some(favorites.count()),
                persisted(&storage).map(|ids| ids.len()),
            );
        }
        assert_eq!(favorites.favorites(), [id(2), id(7), id(3)]);
    }

    #[test]
    fn hydrates_from_storage() {
        let storage = MemoryStorage::new();
        storage.set(Favorites::<MemoryStorage>::STORAGE_KEY, "[4,2,4]").unwrap();

        let favorites = Favorites::load(storage.clone());

        assert_eq!(favorites.favorites(), [id(4), id(2)]);
        assert_eq!(persisted(&storage), Some(vec![id(4), id(2)]));
    }

    /// [`Storage`] refusing any writes.
    struct ReadOnly(MemoryStorage);

    impl Storage for ReadOnly {
        fn get(
            &self,
            key: &str,
        ) -> Result<Option<String>, Traced<StorageError>> {
            self.0.get(key)
        }

        fn set(&self, _: &str, _: &str) -> Result<(), Traced<StorageError>> {
            Err(tracerr::new!(StorageError::Io(io::ErrorKind::Other.into())))
        }

        fn remove(&self, _: &str) -> Result<(), Traced<StorageError>> {
            Err(tracerr::new!(StorageError::Io(io::ErrorKind::Other.into())))
        }
    }

    #[test]
    fn deduplicates_even_if_storage_is_read_only() {
        let storage = MemoryStorage::new();
        storage
            .set(Favorites::<MemoryStorage>::STORAGE_KEY, "[4,2,4]")
            .unwrap();

        let favorites = Favorites::load(ReadOnly(storage.clone()));

        assert_eq!(favorites.favorites(), [id(4), id(2)]);
        assert_eq!(favorites.count(), 2);
        assert_eq!(persisted(&storage), Some(vec![id(4), id(2), id(4)]));
    }

    #[test]
    fn treats_malformed_value_as_empty() {
        let storage = MemoryStorage::new();
        storage.set(Favorites::<MemoryStorage>::STORAGE_KEY, "{oops").unwrap();

        let favorites = Favorites::load(storage);

        assert_eq!(favorites.count(), 0);
    }

    #[test]
    fn clear_removes_persisted_set() {
        let storage = MemoryStorage::new();
        let favorites = Favorites::load(storage.clone());
        _ = favorites.toggle(id(1)).unwrap();

        favorites.clear().unwrap();

        assert_eq!(favorites.count(), 0);
        assert_eq!(persisted(&storage), None);
    }

    #[test]
    fn clones_observe_each_other() {
        let favorites = Favorites::load(MemoryStorage::new());
        let badge = favorites.clone();
        let mut changes = badge.subscribe();

        _ = favorites.toggle(id(9)).unwrap();

        assert!(changes.has_changed().unwrap());
        assert_eq!(*changes.borrow_and_update(), [id(9)]);
        assert!(badge.is_favorite(id(9)));
    }
}
