//! Observable state backed by a [`Storage`].

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::watch;
use tracerr::Traced;

use crate::storage::{Storage, StorageError};

/// Observable `T` value persisted as JSON under a fixed key of a [`Storage`].
#[derive(Debug)]
pub(crate) struct Store<T, S> {
    /// Key the value is persisted under.
    key: &'static str,

    /// [`Storage`] the value is persisted into.
    storage: S,

    /// Current value, notifying its subscribers on changes.
    state: watch::Sender<T>,
}

impl<T, S> Store<T, S>
where
    T: Default + DeserializeOwned + Serialize,
    S: Storage,
{
    /// Hydrates a new [`Store`] from the provided [`Storage`].
    ///
    /// A missing, unreadable or malformed value is treated as the default
    /// one. The hydrated value is then passed through the `normalize`
    /// function, and the normalized value (if any) replaces the persisted one.
    pub(crate) fn load(
        storage: S,
        key: &'static str,
        normalize: impl FnOnce(&T) -> Option<T>,
    ) -> Self {
        let value = match storage.get(key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(key, "ignoring malformed stored value: {e}");
                T::default()
            }),
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key, "failed to read stored value: {e}");
                T::default()
            }
        };

        let normalized = normalize(&value);
        let is_normalized = normalized.is_some();

        let (state, _) = watch::channel(normalized.unwrap_or(value));
        let store = Self {
            key,
            storage,
            state,
        };
        if is_normalized {
            if let Err(e) = store.persist(&store.borrow()) {
                tracing::warn!(key, "failed to persist normalized value: {e}");
            }
        }
        store
    }

    /// Returns the current value.
    pub(crate) fn borrow(&self) -> watch::Ref<'_, T> {
        self.state.borrow()
    }

    /// Subscribes to changes of the value.
    pub(crate) fn subscribe(&self) -> watch::Receiver<T> {
        self.state.subscribe()
    }

    /// Modifies the value with the provided function.
    ///
    /// The function returns the new value (or [`None`] if it stays unchanged)
    /// along with the result to return. A new value is persisted first and
    /// only then becomes current, notifying the subscribers.
    ///
    /// # Errors
    ///
    /// If the new value cannot be persisted. The current value stays intact.
    pub(crate) fn modify<R>(
        &self,
        f: impl FnOnce(&T) -> (Option<T>, R),
    ) -> Result<R, Traced<StorageError>> {
        let mut result = None;
        let _ = self.state.send_if_modified(|current| {
            let (new, out) = f(current);
            let Some(new) = new else {
                result = Some(Ok(out));
                return false;
            };
            match self.persist(&new) {
                Ok(()) => {
                    *current = new;
                    result = Some(Ok(out));
                    true
                }
                Err(e) => {
                    result = Some(Err(e));
                    false
                }
            }
        });
        // `send_if_modified()` always invokes the closure.
        result.unwrap_or_else(|| unreachable!())
    }

    /// Removes the persisted value, resetting the current one to the default.
    ///
    /// # Errors
    ///
    /// If the persisted value cannot be removed.
    pub(crate) fn remove(&self) -> Result<(), Traced<StorageError>> {
        self.storage.remove(self.key).map_err(tracerr::wrap!())?;
        let _ = self.state.send_replace(T::default());
        Ok(())
    }

    /// Persists the provided value.
    fn persist(&self, value: &T) -> Result<(), Traced<StorageError>> {
        let raw = serde_json::to_string(value)
            .map_err(StorageError::from)
            .map_err(tracerr::wrap!())?;
        self.storage.set(self.key, &raw).map_err(tracerr::wrap!())
    }
}
