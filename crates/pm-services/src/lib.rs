//! # pm-services
//!
//! In-memory working copies of the stored collections and the operations
//! that mutate them.
//!
//! Every mutation follows the same path: take the cached collection, apply
//! the change to a copy, write the whole copy back conditioned on the version
//! the cache was loaded at, then swap the copy into the cache. The outcome is
//! a `MutationResult`:
//!
//! - `Err(PmError::NotFound)` / `Err(PmError::Validation)` - nothing changed
//! - `Err(PmError::Conflict)` - someone else wrote the collection since it
//!   was loaded; the cache has been reloaded and nothing was written
//! - `Ok(applied)` with `applied.status` telling whether the write reached
//!   the storage medium

mod synced;

pub mod projects;
pub mod team;
pub mod stats;

pub use projects::ProjectRepository;
pub use team::{TeamRoster, TeamStats};
pub use stats::{DashboardStats, COMPLETED_STATUSES};
