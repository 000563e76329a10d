//! Write models for projects and requirements
//!
//! Drafts carry every field except the id, which the repository assigns.
//! Patches are shallow: each `Some` field replaces the stored value wholesale,
//! nested objects included, and `None` fields are left untouched.

use chrono::NaiveDate;
use pm_core::error::ValidationErrors;
use pm_core::traits::Id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::model::{Assignee, Owner, Project, ProjectUpdate, Requirement, Risk, TeamSlot};
use crate::milestone::Milestones;
use crate::validation::collect_errors;
use crate::priority::Priority;

/// Project data before an id has been assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub progress: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub owner: Owner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<Assignee>>,
    #[serde(default)]
    pub team: BTreeMap<String, TeamSlot>,
    pub milestones: Milestones,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub daily_progress: String,
    pub last_update: NaiveDate,
    #[serde(default)]
    pub risks: Vec<Risk>,
    #[serde(default)]
    pub updates: Vec<ProjectUpdate>,
}

impl ProjectDraft {
    /// Template for a freshly created project: thirty days long, all
    /// milestones pending and planned at their default offsets.
    pub fn blank(today: NaiveDate, owner: Owner) -> Self {
        let milestones = Milestones::planned_from(today, &owner.name);
        Self {
            name: "New Project".to_string(),
            description: "Describe the project".to_string(),
            status: "PRD Review".to_string(),
            priority: Priority::Medium,
            category: "Product Development".to_string(),
            tags: Vec::new(),
            progress: 0,
            start_date: today,
            end_date: today + chrono::Duration::days(30),
            owner,
            assignees: None,
            team: BTreeMap::new(),
            milestones,
            requirements: Vec::new(),
            daily_progress: "Project just created".to_string(),
            last_update: today,
            risks: Vec::new(),
            updates: Vec::new(),
        }
    }

    /// Field rules checked before a draft reaches the store
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = collect_errors(self.validate());
        if self.name.trim().is_empty() && !errors.has_error("name") {
            errors.add("name", "can't be blank");
        }
        if self.owner.name.trim().is_empty() {
            errors.add("owner", "name can't be blank");
        }
        errors.into_result()
    }

    pub fn into_project(self, id: Id) -> Project {
        Project {
            id,
            name: self.name,
            description: self.description,
            status: self.status,
            priority: self.priority,
            category: self.category,
            tags: self.tags,
            progress: self.progress,
            start_date: self.start_date,
            end_date: self.end_date,
            owner: self.owner,
            assignees: self.assignees,
            team: self.team,
            milestones: self.milestones,
            requirements: self.requirements,
            daily_progress: self.daily_progress,
            last_update: self.last_update,
            risks: self.risks,
            updates: self.updates,
        }
    }
}

/// Shallow patch over a stored project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<Assignee>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<BTreeMap<String, TeamSlot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestones: Option<Milestones>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<Requirement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_progress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks: Option<Vec<Risk>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updates: Option<Vec<ProjectUpdate>>,
}

impl ProjectPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_progress(mut self, progress: i32) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_last_update(mut self, date: NaiveDate) -> Self {
        self.last_update = Some(date);
        self
    }

    /// True when applying the patch would change nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Replace every field present in the patch
    pub fn apply_to(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(priority) = self.priority {
            project.priority = priority;
        }
        if let Some(category) = self.category {
            project.category = category;
        }
        if let Some(tags) = self.tags {
            project.tags = tags;
        }
        if let Some(progress) = self.progress {
            project.progress = progress;
        }
        if let Some(start_date) = self.start_date {
            project.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            project.end_date = end_date;
        }
        if let Some(owner) = self.owner {
            project.owner = owner;
        }
        if let Some(assignees) = self.assignees {
            project.assignees = Some(assignees);
        }
        if let Some(team) = self.team {
            project.team = team;
        }
        if let Some(milestones) = self.milestones {
            project.milestones = milestones;
        }
        if let Some(requirements) = self.requirements {
            project.requirements = requirements;
        }
        if let Some(daily_progress) = self.daily_progress {
            project.daily_progress = daily_progress;
        }
        if let Some(last_update) = self.last_update {
            project.last_update = last_update;
        }
        if let Some(risks) = self.risks {
            project.risks = risks;
        }
        if let Some(updates) = self.updates {
            project.updates = updates;
        }
    }
}

/// Requirement data before an id has been assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequirementDraft {
    #[validate(length(min = 1, max = 255))]
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

impl RequirementDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: String::new(),
            priority: Priority::Medium,
            assignee: String::new(),
            progress: 0,
            description: None,
        }
    }

    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = collect_errors(self.validate());
        if self.title.trim().is_empty() && !errors.has_error("title") {
            errors.add("title", "can't be blank");
        }
        errors.into_result()
    }

    pub fn into_requirement(self, id: Id) -> Requirement {
        Requirement {
            id,
            title: self.title,
            status: self.status,
            priority: self.priority,
            assignee: self.assignee,
            progress: self.progress,
            description: self.description,
        }
    }
}

/// Shallow patch over a stored requirement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RequirementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RequirementPatch {
    pub fn apply_to(self, requirement: &mut Requirement) {
        if let Some(title) = self.title {
            requirement.title = title;
        }
        if let Some(status) = self.status {
            requirement.status = status;
        }
        if let Some(priority) = self.priority {
            requirement.priority = priority;
        }
        if let Some(assignee) = self.assignee {
            requirement.assignee = assignee;
        }
        if let Some(progress) = self.progress {
            requirement.progress = progress;
        }
        if let Some(description) = self.description {
            requirement.description = Some(description);
        }
    }
}
