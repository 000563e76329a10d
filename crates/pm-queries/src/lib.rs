//! # pm-queries
//!
//! Derived views over cached collections. Nothing here does I/O: filters
//! take a slice and return the matching records in their original order.
//!
//! - `criterion` - a single "all or exactly this" selector
//! - `projects` - `ProjectFilters`, free text plus four categorical criteria
//! - `members` - `MemberFilters` for the team roster
//! - `facets` - distinct values for populating filter pickers
//!
//! ## Example
//!
//! ```
//! use pm_models::{seed, Priority};
//! use pm_queries::ProjectFilters;
//!
//! let projects = seed::default_projects();
//! let filters = ProjectFilters::new()
//!     .with_search("checkout")
//!     .with_priority(Priority::High);
//!
//! assert_eq!(filters.apply(&projects).len(), 1);
//! ```

pub mod criterion;
pub mod projects;
pub mod members;
pub mod facets;

pub use criterion::Criterion;
pub use projects::ProjectFilters;
pub use members::MemberFilters;
pub use facets::{MemberFacets, ProjectFacets};

/// Case-insensitive substring test; an empty needle matches everything
pub(crate) fn contains_folded(haystack: &str, needle_folded: &str) -> bool {
    needle_folded.is_empty() || haystack.to_lowercase().contains(needle_folded)
}
