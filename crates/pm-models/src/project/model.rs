//! Project record
//!
//! Persisted as one element of the `projects` collection.

use chrono::NaiveDate;
use pm_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::milestone::Milestones;
use crate::priority::Priority;

/// Project owner, embedded in the project record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Optional list of people picked for a project, independent of the team slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Snapshot of a team member filling a role slot
///
/// A denormalized copy; it does not follow later edits to the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSlot {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub progress: i32,
    /// Free text such as "70%"
    #[serde(default)]
    pub workload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    /// Unique within the owning project only
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub progress: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Identifiable for Requirement {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Requirement {
    const TYPE_NAME: &'static str = "Requirement";
}

/// Risk entry; risks have no identity and are removed by position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub level: Priority,
    pub description: String,
}

impl Risk {
    pub fn new(level: Priority, description: impl Into<String>) -> Self {
        Self {
            level,
            description: description.into(),
        }
    }
}

/// Entry in a project's update log (newest first)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    /// Milliseconds since the Unix epoch at creation time
    pub id: Id,
    pub author: String,
    pub date: NaiveDate,
    pub content: String,
    #[serde(rename = "type", default = "default_update_type")]
    pub kind: String,
}

fn default_update_type() -> String {
    ProjectUpdate::KIND_UPDATE.to_string()
}

impl ProjectUpdate {
    pub const KIND_UPDATE: &'static str = "update";
}

impl Identifiable for ProjectUpdate {
    fn id(&self) -> Id {
        self.id
    }
}

/// Project entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Free-form workflow stage, e.g. "In Development"
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Percent complete; 0..=100 by convention, not enforced
    #[serde(default)]
    pub progress: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub owner: Owner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<Assignee>>,
    /// Role slot ("frontend", "backend", ...) -> member snapshot
    #[serde(default)]
    pub team: BTreeMap<String, TeamSlot>,
    pub milestones: Milestones,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    /// Most recent free-text update, mirrored from the head of `updates`
    #[serde(default)]
    pub daily_progress: String,
    pub last_update: NaiveDate,
    #[serde(default)]
    pub risks: Vec<Risk>,
    #[serde(default)]
    pub updates: Vec<ProjectUpdate>,
}

impl Identifiable for Project {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Project {
    const TYPE_NAME: &'static str = "Project";
}

impl Project {
    /// Append a tag unless it is already present. Returns whether it was added.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove every occurrence of a tag. Returns whether anything was removed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn requirement(&self, id: Id) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.id == id)
    }

    /// Most recent update log entry
    pub fn latest_update(&self) -> Option<&ProjectUpdate> {
        self.updates.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_tags_avoid_duplicates() {
        let mut project = seed::default_projects().remove(0);
        let before = project.tags.len();

        assert!(project.add_tag("backend"));
        assert!(!project.add_tag("backend"));
        assert_eq!(project.tags.len(), before + 1);

        assert!(project.remove_tag("backend"));
        assert!(!project.remove_tag("backend"));
        assert_eq!(project.tags.len(), before);
    }

    #[test]
    fn test_camel_case_layout() {
        let project = seed::default_projects().remove(0);
        let value = serde_json::to_value(&project).unwrap();

        assert!(value.get("startDate").is_some());
        assert!(value.get("dailyProgress").is_some());
        assert!(value["milestones"].get("techReview").is_some());
        assert!(value["milestones"]["prd"].get("plannedDate").is_some());
        assert_eq!(value["lastUpdate"], "2024-02-15");
    }

    #[test]
    fn test_update_type_field() {
        let update = ProjectUpdate {
            id: 1,
            author: "dana".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            content: "shipped".to_string(),
            kind: ProjectUpdate::KIND_UPDATE.to_string(),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["type"], "update");
    }

    #[test]
    fn test_optional_collections_default() {
        let mut value = serde_json::to_value(seed::default_projects().remove(0)).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("updates");
        obj.remove("risks");
        obj.remove("tags");

        let project: Project = serde_json::from_value(value).unwrap();
        assert!(project.updates.is_empty());
        assert!(project.risks.is_empty());
        assert!(project.tags.is_empty());
    }
}
