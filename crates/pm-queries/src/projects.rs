//! Project list filters
//!
//! Five independent criteria, ANDed together. Every criterion defaults to
//! matching everything, so a fresh `ProjectFilters` returns its input as is.

use pm_models::{Priority, Project};
use serde::{Deserialize, Serialize};

use crate::contains_folded;
use crate::criterion::Criterion;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilters {
    /// Free text matched against name and description, case-insensitively
    pub search: String,
    pub status: Criterion,
    pub priority: Criterion<Priority>,
    pub category: Criterion,
    /// Tag membership
    pub tag: Criterion,
}

impl ProjectFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Criterion::only(status);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Criterion::Only(priority);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Criterion::only(category);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Criterion::only(tag);
        self
    }

    /// Back to matching everything
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when no criterion narrows the result
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty()
            && self.status.is_all()
            && self.priority.is_all()
            && self.category.is_all()
            && self.tag.is_all()
    }

    pub fn matches(&self, project: &Project) -> bool {
        let needle = self.search.to_lowercase();
        self.matches_folded(project, &needle)
    }

    /// Matching projects, in input order
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        let needle = self.search.to_lowercase();
        projects
            .iter()
            .filter(|p| self.matches_folded(p, &needle))
            .collect()
    }

    fn matches_folded(&self, project: &Project, needle: &str) -> bool {
        let text = contains_folded(&project.name, needle)
            || contains_folded(&project.description, needle);
        let tag = match &self.tag {
            Criterion::All => true,
            Criterion::Only(tag) => project.has_tag(tag),
        };

        text
            && self.status.matches(&project.status)
            && self.priority.matches(&project.priority)
            && self.category.matches(&project.category)
            && tag
    }
}
