//! Project repository
//!
//! The only writer of the `projects` collection. Holds the session's cached
//! copy and keeps it in step with the store.

mod crud;
mod activity;

use std::sync::Arc;

use pm_core::clock::Clock;
use pm_core::error::PmError;
use pm_core::result::PmResult;
use pm_core::traits::Id;
use pm_models::Project;
use pm_store::{Collection, Initializer, PersistentStore, Storage, Version};
use tracing::info;

use crate::synced::SyncedCollection;

pub struct ProjectRepository<S: Storage> {
    projects: SyncedCollection<S, Project>,
    clock: Arc<dyn Clock>,
    seed_defaults: bool,
}

impl<S: Storage> ProjectRepository<S> {
    /// Unloaded repository; call `load` before reading
    pub fn new(store: Arc<PersistentStore<S>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            projects: SyncedCollection::new(store, Collection::Projects),
            clock,
            seed_defaults: true,
        }
    }

    /// Skip seeding the demonstration project on load
    pub fn without_seed(mut self) -> Self {
        self.seed_defaults = false;
        self
    }

    /// Construct and load in one step
    pub fn open(store: Arc<PersistentStore<S>>, clock: Arc<dyn Clock>, seed_defaults: bool) -> Self {
        let mut repository = Self::new(store, clock);
        repository.seed_defaults = seed_defaults;
        repository.load();
        repository
    }

    /// Seed an empty store if enabled, then fill the cache
    pub fn load(&self) -> usize {
        if self.seed_defaults {
            Initializer::new(&**self.projects.store()).run();
        }
        let count = self.projects.load_with(Vec::new);
        info!(count, "Projects loaded");
        count
    }

    /// Re-read the store, e.g. after an import replaced the collection
    pub fn reload(&self) -> usize {
        self.load()
    }

    pub fn is_loaded(&self) -> bool {
        self.projects.is_loaded()
    }

    /// Version of the collection the cache was last synchronised with
    pub fn version(&self) -> Version {
        self.projects.version()
    }

    /// Cached projects in insertion order
    pub fn projects(&self) -> Vec<Project> {
        self.projects.snapshot()
    }

    pub fn with_projects<R>(&self, f: impl FnOnce(&[Project]) -> R) -> R {
        self.projects.read(f)
    }

    pub fn get_project(&self, id: Id) -> PmResult<Project> {
        self.projects.get(id)
    }

    pub fn len(&self) -> usize {
        self.projects.read(|projects| projects.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

/// Locate a project by id inside a mutable copy of the collection
fn find_mut(projects: &mut [Project], id: Id) -> PmResult<&mut Project> {
    projects
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| PmError::not_found("Project", id))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::NaiveDate;
    use pm_core::clock::FixedClock;
    use pm_store::MemoryStorage;

    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    pub fn store() -> Arc<PersistentStore<MemoryStorage>> {
        Arc::new(PersistentStore::new(MemoryStorage::new(), "pm"))
    }

    pub fn repository(store: &Arc<PersistentStore<MemoryStorage>>) -> ProjectRepository<MemoryStorage> {
        ProjectRepository::open(store.clone(), Arc::new(FixedClock::on(today())), true)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_load_seeds_and_caches() {
        let store = store();
        let repo = ProjectRepository::new(store.clone(), Arc::new(pm_core::clock::SystemClock));
        assert!(!repo.is_loaded());

        assert_eq!(repo.load(), 1);
        assert!(repo.is_loaded());
        assert_eq!(repo.get_project(1).unwrap().name, "E-commerce Platform Upgrade");
        assert!(repo.get_project(2).unwrap_err().is_not_found());
    }

    #[test]
    fn test_without_seed_stays_empty() {
        let store = store();
        let repo = ProjectRepository::new(store, Arc::new(pm_core::clock::SystemClock)).without_seed();
        repo.load();
        assert!(repo.is_empty());
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let store = store();
        let repo = repository(&store);

        store.save_collection(Collection::Projects, &Vec::<Project>::new());
        assert_eq!(repo.len(), 1);

        // Empty again, so the seed is written back
        assert_eq!(repo.reload(), 1);
        assert_eq!(repo.version(), store.version(Collection::Projects));
    }

    #[test]
    fn test_changes_survive_reopen_on_disk() {
        use pm_core::clock::FixedClock;
        use pm_store::LocalStorage;

        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(FixedClock::on(today()));
        {
            let storage = LocalStorage::open(dir.path()).unwrap();
            let store = Arc::new(PersistentStore::new(storage, "pm"));
            let repo = ProjectRepository::open(store, clock.clone(), true);
            repo.update_project_progress(1, 80).unwrap();
        }

        let storage = LocalStorage::open(dir.path()).unwrap();
        let store = Arc::new(PersistentStore::new(storage, "pm"));
        let repo = ProjectRepository::open(store, clock, true);
        let project = repo.get_project(1).unwrap();
        assert_eq!(project.progress, 80);
        assert_eq!(project.last_update, today());
    }
}
