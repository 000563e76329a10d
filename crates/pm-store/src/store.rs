//! Persistent store over a key-value medium
//!
//! Each collection is one JSON document under `<prefix>_<collection>` and is
//! always read and written whole. A second key, `<prefix>_<collection>.version`,
//! counts writes so that callers holding a cached copy can detect that someone
//! else wrote in between (another process sharing the data directory, or an
//! import).
//!
//! Every write holds the medium's lock from reading the counter until the data
//! is stored, so two writers that loaded the same version cannot both succeed.

use pm_core::config::Settings;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, instrument, warn};

use crate::collection::{Collection, Version};
use crate::error::{StoreError, StoreResult};
use crate::storage::Storage;

pub struct PersistentStore<S: Storage> {
    storage: S,
    prefix: String,
}

impl<S: Storage> PersistentStore<S> {
    pub fn new(storage: S, prefix: impl Into<String>) -> Self {
        Self {
            storage,
            prefix: prefix.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn key(&self, collection: Collection) -> String {
        collection.key(&self.prefix)
    }

    /// Raw JSON text of a collection, `None` when never written
    pub fn try_read_raw(&self, collection: Collection) -> StoreResult<Option<String>> {
        Ok(self.storage.get(&self.key(collection))?)
    }

    /// Current write counter of a collection
    pub fn try_version(&self, collection: Collection) -> StoreResult<Version> {
        match self.storage.get(&collection.version_key(&self.prefix))? {
            None => Ok(Version::INITIAL),
            Some(raw) => serde_json::from_str::<u64>(raw.trim())
                .map(Version)
                .map_err(|source| StoreError::Serialization { collection, source }),
        }
    }

    /// Like `try_version`, but an unreadable counter reads as `Version::INITIAL`
    pub fn version(&self, collection: Collection) -> Version {
        self.try_version(collection).unwrap_or_else(|e| {
            warn!(collection = %collection, error = %e, "Failed to read collection version");
            Version::INITIAL
        })
    }

    /// Read an array collection; an absent key is an empty collection
    pub fn try_get_collection<T: DeserializeOwned>(&self, collection: Collection) -> StoreResult<Vec<T>> {
        match self.try_read_raw(collection)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|source| StoreError::Serialization { collection, source }),
        }
    }

    /// Read an array collection, never failing
    ///
    /// Absent, unparsable and unavailable all read as an empty collection;
    /// the latter two are logged.
    pub fn get_collection<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        self.try_get_collection(collection).unwrap_or_else(|e| {
            warn!(collection = %collection, error = %e, "Failed to read collection, using empty");
            Vec::new()
        })
    }

    /// Overwrite an array collection unconditionally (last write wins)
    pub fn try_save_collection<T: Serialize>(
        &self,
        collection: Collection,
        records: &[T],
    ) -> StoreResult<Version> {
        self.write(collection, &records, None)
    }

    /// Overwrite an array collection only if nobody wrote since `expected`
    pub fn try_save_collection_if<T: Serialize>(
        &self,
        collection: Collection,
        records: &[T],
        expected: Version,
    ) -> StoreResult<Version> {
        self.write(collection, &records, Some(expected))
    }

    /// Overwrite an array collection; failures are logged and swallowed
    pub fn save_collection<T: Serialize>(&self, collection: Collection, records: &[T]) {
        if let Err(e) = self.try_save_collection(collection, records) {
            error!(collection = %collection, error = %e, "Failed to save collection");
        }
    }

    /// Read the settings object; absent reads as empty settings
    pub fn try_get_settings(&self) -> StoreResult<Settings> {
        match self.try_read_raw(Collection::Settings)? {
            None => Ok(Settings::default()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Serialization {
                collection: Collection::Settings,
                source,
            }),
        }
    }

    pub fn get_settings(&self) -> Settings {
        self.try_get_settings().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read settings, using empty");
            Settings::default()
        })
    }

    pub fn try_save_settings(&self, settings: &Settings) -> StoreResult<Version> {
        self.write(Collection::Settings, settings, None)
    }

    pub fn save_settings(&self, settings: &Settings) {
        if let Err(e) = self.try_save_settings(settings) {
            error!(error = %e, "Failed to save settings");
        }
    }

    /// Remove all three collections
    ///
    /// Version counters are bumped rather than removed, so a cache taken
    /// before the clear can never match a version issued after it.
    pub fn try_clear_all(&self) -> StoreResult<()> {
        let _lock = self.storage.lock()?;
        for collection in Collection::ALL {
            let next = self.try_version(collection).unwrap_or_default().next();
            self.storage
                .set(&collection.version_key(&self.prefix), &next.0.to_string())?;
            self.storage.remove(&self.key(collection))?;
        }
        debug!(prefix = %self.prefix, "All collections cleared");
        Ok(())
    }

    pub fn clear_all(&self) {
        if let Err(e) = self.try_clear_all() {
            error!(error = %e, "Failed to clear collections");
        }
    }

    #[instrument(skip(self, value), fields(storage = self.storage.name()))]
    fn write<V: Serialize + ?Sized>(
        &self,
        collection: Collection,
        value: &V,
        expected: Option<Version>,
    ) -> StoreResult<Version> {
        let json = serde_json::to_string(value)
            .map_err(|source| StoreError::Serialization { collection, source })?;

        let _lock = self.storage.lock()?;
        let current = self.try_version(collection)?;
        if let Some(expected) = expected {
            if expected != current {
                return Err(StoreError::VersionMismatch {
                    collection,
                    expected,
                    found: current,
                });
            }
        }

        // Bump the counter before the data: a failed data write then shows up
        // as a harmless spurious change instead of an undetected one.
        let next = current.next();
        self.storage
            .set(&collection.version_key(&self.prefix), &next.0.to_string())?;
        self.storage.set(&self.key(collection), &json)?;

        debug!(version = %next, bytes = json.len(), "Collection saved");
        Ok(next)
    }
}
