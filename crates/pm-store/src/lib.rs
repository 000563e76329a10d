//! # pm-store
//!
//! Durable key-value persistence for the three dashboard collections
//! (`projects`, `settings`, `teamMembers`).
//!
//! - `storage` - the synchronous, size-bounded key-value medium
//!   (`LocalStorage` on disk, `MemoryStorage` in memory)
//! - `store` - `PersistentStore`, whole-collection reads and writes with
//!   per-collection version counters
//! - `snapshot` - export/import of all collections at once
//! - `initializer` - seeds the demonstration project into an empty store
//!
//! ## Example
//!
//! ```
//! use pm_store::{Collection, Initializer, MemoryStorage, PersistentStore};
//! use pm_models::Project;
//!
//! let store = PersistentStore::new(MemoryStorage::new(), "project_management");
//! Initializer::new(&store).run();
//!
//! let projects: Vec<Project> = store.get_collection(Collection::Projects);
//! assert_eq!(projects.len(), 1);
//! ```

pub mod error;
pub mod storage;
pub mod collection;
pub mod store;
pub mod snapshot;
pub mod initializer;

pub use error::{StoreError, StoreResult};
pub use storage::{LocalStorage, MemoryStorage, Storage, StorageError, StorageLock, StorageResult};
pub use collection::{Collection, Version};
pub use store::PersistentStore;
pub use snapshot::{ImportSummary, Snapshot};
pub use initializer::Initializer;
