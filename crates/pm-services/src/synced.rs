//! Cached copy of one stored collection

use std::sync::Arc;

use parking_lot::RwLock;
use pm_core::error::PmError;
use pm_core::result::{Applied, MutationResult, PmResult};
use pm_core::traits::{Entity, Id};
use pm_store::{Collection, PersistentStore, Storage, StoreError, Version};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

struct State<T> {
    records: Vec<T>,
    version: Version,
    loaded: bool,
}

pub(crate) struct SyncedCollection<S: Storage, T> {
    store: Arc<PersistentStore<S>>,
    collection: Collection,
    state: RwLock<State<T>>,
}

impl<S, T> SyncedCollection<S, T>
where
    S: Storage,
    T: Entity + Clone + Serialize + DeserializeOwned,
{
    pub(crate) fn new(store: Arc<PersistentStore<S>>, collection: Collection) -> Self {
        Self {
            store,
            collection,
            state: RwLock::new(State {
                records: Vec::new(),
                version: Version::INITIAL,
                loaded: false,
            }),
        }
    }

    pub(crate) fn store(&self) -> &Arc<PersistentStore<S>> {
        &self.store
    }

    /// Replace the cache with what the store holds now
    ///
    /// An unreadable collection loads as empty, as `get_collection` does.
    /// `fallback` supplies records to hold in memory when the stored
    /// collection is empty; they are written by the first mutation.
    pub(crate) fn load_with(&self, fallback: impl FnOnce() -> Vec<T>) -> usize {
        let mut state = self.state.write();
        // Version first: a write landing between the two reads then shows up
        // as a conflict on our next mutation instead of being missed.
        state.version = self.store.version(self.collection);
        let mut records: Vec<T> = self.store.get_collection(self.collection);
        if records.is_empty() {
            records = fallback();
        }
        state.records = records;
        state.loaded = true;
        debug!(
            collection = %self.collection,
            count = state.records.len(),
            version = %state.version,
            "Collection loaded"
        );
        state.records.len()
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.state.read().loaded
    }

    pub(crate) fn version(&self) -> Version {
        self.state.read().version
    }

    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.state.read().records.clone()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.state.read().records)
    }

    pub(crate) fn get(&self, id: Id) -> PmResult<T> {
        self.read(|records| records.iter().find(|r| r.id() == id).cloned())
            .ok_or_else(|| PmError::not_found(T::TYPE_NAME, id))
    }

    /// Apply `f` to a copy of the cached records and write the copy back
    ///
    /// `f` failing leaves both cache and store untouched. A version mismatch
    /// reloads the cache (with `fallback` as in `load_with`) and reports a
    /// conflict. Any other write failure still commits the copy to the cache.
    pub(crate) fn mutate<R>(
        &self,
        fallback: impl FnOnce() -> Vec<T>,
        f: impl FnOnce(&mut Vec<T>) -> PmResult<R>,
    ) -> MutationResult<R> {
        let mut state = self.state.write();
        let mut records = state.records.clone();
        let value = f(&mut records)?;

        match self
            .store
            .try_save_collection_if(self.collection, &records, state.version)
        {
            Ok(version) => {
                state.records = records;
                state.version = version;
                Ok(Applied::persisted(value))
            }
            Err(err @ StoreError::VersionMismatch { .. }) => {
                warn!(collection = %self.collection, error = %err, "Stale cache, reloading");
                drop(state);
                self.load_with(fallback);
                Err(err.into())
            }
            Err(err) => {
                error!(collection = %self.collection, error = %err, "Change kept in memory but not persisted");
                state.records = records;
                // A failed write may still have bumped the counter
                state.version = self.store.version(self.collection);
                Ok(Applied::persist_failed(value, err.to_string()))
            }
        }
    }
}
