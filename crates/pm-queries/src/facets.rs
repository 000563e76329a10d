//! Distinct values for filter pickers, in first-seen order

use pm_models::{Project, TeamMember};
use serde::Serialize;

fn distinct<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectFacets {
    pub statuses: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

impl ProjectFacets {
    pub fn collect(projects: &[Project]) -> Self {
        Self {
            statuses: distinct(projects.iter().map(|p| p.status.as_str())),
            categories: distinct(projects.iter().map(|p| p.category.as_str())),
            tags: distinct(projects.iter().flat_map(|p| p.tags.iter().map(String::as_str))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemberFacets {
    pub departments: Vec<String>,
    pub roles: Vec<String>,
}

impl MemberFacets {
    pub fn collect(members: &[TeamMember]) -> Self {
        Self {
            departments: distinct(members.iter().map(|m| m.department.as_str())),
            roles: distinct(members.iter().map(|m| m.role.as_str())),
        }
    }
}
