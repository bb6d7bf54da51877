//! Key/value [`Storage`] of selections.

use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use derive_more::{Display, Error, From};
use tracerr::Traced;

/// Persistent key/value storage of string values.
///
/// Operations are synchronous: a value is stored once the method returns.
pub trait Storage {
    /// Returns the value stored under the provided `key`, if any.
    ///
    /// # Errors
    ///
    /// If the value cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Traced<StorageError>>;

    /// Stores the provided `value` under the provided `key`, replacing the
    /// previous one.
    ///
    /// # Errors
    ///
    /// If the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Traced<StorageError>>;

    /// Removes the value stored under the provided `key`, if any.
    ///
    /// # Errors
    ///
    /// If the value cannot be removed.
    fn remove(&self, key: &str) -> Result<(), Traced<StorageError>>;
}

/// Error of a [`Storage`] or of encoding a value for it.
#[derive(Debug, Display, Error, From)]
pub enum StorageError {
    /// I/O operation failed.
    #[display("`Storage` I/O failed: {_0}")]
    Io(io::Error),

    /// Value cannot be encoded.
    #[display("Failed to encode value: {_0}")]
    Encode(serde_json::Error),
}

/// In-memory [`Storage`], living as long as the process does.
///
/// Clones share the same underlying values.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage(Arc<Mutex<HashMap<String, String>>>);

impl MemoryStorage {
    /// Creates a new empty [`MemoryStorage`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the stored values.
    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // Values are replaced atomically, so a poisoned lock is still valid.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Traced<StorageError>> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Traced<StorageError>> {
        drop(self.values().insert(key.to_owned(), value.to_owned()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Traced<StorageError>> {
        drop(self.values().remove(key));
        Ok(())
    }
}

/// [`Storage`] keeping every value in a separate file of a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    /// Directory the files are kept in.
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a new [`FileStorage`] in the provided directory.
    ///
    /// The directory is created on the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the path of the file storing the provided `key`.
    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Traced<StorageError>> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(tracerr::new!(StorageError::from(e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Traced<StorageError>> {
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(self.path(key), value))
            .map_err(StorageError::from)
            .map_err(tracerr::wrap!())?;
        tracing::debug!(key, "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Traced<StorageError>> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(tracerr::new!(StorageError::from(e))),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::env;

    use super::{FileStorage, MemoryStorage, Storage};

    fn exercise(storage: &impl Storage) {
        assert_eq!(storage.get("key").unwrap(), None);

        storage.set("key", "[1,2]").unwrap();
        storage.set("key", "[3]").unwrap();
        assert_eq!(storage.get("key").unwrap().as_deref(), Some("[3]"));

        storage.remove("key").unwrap();
        storage.remove("key").unwrap();
        assert_eq!(storage.get("key").unwrap(), None);
    }

    #[test]
    fn memory_storage_stores_values() {
        let storage = MemoryStorage::new();
        exercise(&storage);

        storage.set("shared", "yes").unwrap();
        assert_eq!(storage.clone().get("shared").unwrap().as_deref(), Some("yes"));
    }

    #[test]
    fn file_storage_stores_values() {
        let dir = env::temp_dir().join(uuid::Uuid::new_v4().to_string());
        let storage = FileStorage::new(&dir);
        exercise(&storage);

        storage.set("persisted", "[4]").unwrap();
        assert_eq!(
            FileStorage::new(&dir).get("persisted").unwrap().as_deref(),
            Some("[4]"),
        );

        std::fs::remove_dir_all(dir).unwrap();
    }
}
