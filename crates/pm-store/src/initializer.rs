//! First-run seeding

use pm_models::{seed, Project};
use tracing::{debug, info, warn};

use crate::collection::Collection;
use crate::storage::Storage;
use crate::store::PersistentStore;

/// Writes the demonstration project into a store whose `projects` collection
/// is empty. Running it again is a no-op.
pub struct Initializer<'a, S: Storage> {
    store: &'a PersistentStore<S>,
    seed: Vec<Project>,
}

impl<'a, S: Storage> Initializer<'a, S> {
    pub fn new(store: &'a PersistentStore<S>) -> Self {
        Self {
            store,
            seed: seed::default_projects(),
        }
    }

    pub fn with_seed(mut self, seed: Vec<Project>) -> Self {
        self.seed = seed;
        self
    }

    /// Returns whether the seed was written
    ///
    /// A collection that exists but cannot be parsed is left alone rather
    /// than overwritten with the seed.
    pub fn run(&self) -> bool {
        match self.store.try_get_collection::<serde_json::Value>(Collection::Projects) {
            Ok(existing) if existing.is_empty() => {}
            Ok(existing) => {
                debug!(count = existing.len(), "Projects present, skipping seed");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "Projects collection unreadable, skipping seed");
                return false;
            }
        }

        match self.store.try_save_collection(Collection::Projects, &self.seed) {
            Ok(version) => {
                info!(count = self.seed.len(), version = %version, "Seeded default projects");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to seed default projects");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_seeds_empty_store_once() {
        let store = PersistentStore::new(MemoryStorage::new(), "pm");
        assert!(Initializer::new(&store).run());
        assert!(!Initializer::new(&store).run());

        let projects: Vec<Project> = store.get_collection(Collection::Projects);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, 1);
        assert_eq!(store.version(Collection::Projects).0, 1);
    }

    #[test]
    fn test_does_not_touch_existing_projects() {
        let store = PersistentStore::new(MemoryStorage::new(), "pm");
        let mut custom = seed::default_projects();
        custom[0].id = 42;
        store.save_collection(Collection::Projects, &custom);

        assert!(!Initializer::new(&store).run());
        let projects: Vec<Project> = store.get_collection(Collection::Projects);
        assert_eq!(projects[0].id, 42);
    }

    #[test]
    fn test_reseeds_after_projects_emptied() {
        let store = PersistentStore::new(MemoryStorage::new(), "pm");
        store.save_collection(Collection::Projects, &Vec::<Project>::new());
        assert!(Initializer::new(&store).with_seed(Vec::new()).run());
        assert!(Initializer::new(&store).run());
    }

    #[test]
    fn test_leaves_corrupt_collection_alone() {
        let store = PersistentStore::new(MemoryStorage::new(), "pm");
        store.storage().set("pm_projects", "oops").unwrap();

        assert!(!Initializer::new(&store).run());
        assert_eq!(
            store.try_read_raw(Collection::Projects).unwrap().as_deref(),
            Some("oops")
        );
    }
}
