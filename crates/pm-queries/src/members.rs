//! Team roster filters

use pm_models::TeamMember;
use serde::{Deserialize, Serialize};

use crate::contains_folded;
use crate::criterion::Criterion;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFilters {
    /// Free text matched against name and email, case-insensitively
    pub search: String,
    pub department: Criterion,
    pub role: Criterion,
}

impl MemberFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Criterion::only(department);
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Criterion::only(role);
        self
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply<'a>(&self, members: &'a [TeamMember]) -> Vec<&'a TeamMember> {
        let needle = self.search.to_lowercase();
        members
            .iter()
            .filter(|m| {
                (contains_folded(&m.name, &needle) || contains_folded(&m.email, &needle))
                    && self.department.matches(&m.department)
                    && self.role.matches(&m.role)
            })
            .collect()
    }
}
