//! Team member roster record
//!
//! Persisted as one element of the `teamMembers` collection. Unlike the team
//! slots embedded in a project, roster entries are the source of truth for a
//! person's contact details, skills and load.

use chrono::NaiveDate;
use pm_core::error::ValidationErrors;
use pm_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::collect_errors;

pub const DEFAULT_AVATAR: &str = "/placeholder.svg?height=40&width=40";

/// Workload above this percentage counts as busy
pub const BUSY_WORKLOAD: i32 = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub join_date: NaiveDate,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Project ids; may dangle if a project was deleted afterwards
    #[serde(default)]
    pub current_projects: Vec<Id>,
    #[serde(default)]
    pub workload: i32,
    #[serde(default)]
    pub performance: i32,
}

impl Identifiable for TeamMember {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for TeamMember {
    const TYPE_NAME: &'static str = "TeamMember";
}

impl TeamMember {
    pub fn is_busy(&self) -> bool {
        self.workload > BUSY_WORKLOAD
    }
}

/// Roster entry before an id has been assigned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MemberDraft {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub role: String,
    #[validate(length(min = 1))]
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub workload: i32,
    #[serde(default)]
    pub performance: i32,
}

impl MemberDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: role.into(),
            department: department.into(),
            ..Default::default()
        }
    }

    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = collect_errors(self.validate());
        for (field, value) in [
            ("name", &self.name),
            ("role", &self.role),
            ("department", &self.department),
        ] {
            if value.trim().is_empty() && !errors.has_error(field) {
                errors.add(field, "can't be blank");
            }
        }
        errors.into_result()
    }

    /// New roster entries join today with no project assignments
    pub fn into_member(self, id: Id, join_date: NaiveDate) -> TeamMember {
        TeamMember {
            id,
            name: self.name,
            email: self.email,
            role: self.role,
            department: self.department,
            avatar: DEFAULT_AVATAR.to_string(),
            phone: self.phone,
            join_date,
            skills: self.skills,
            current_projects: Vec::new(),
            workload: self.workload,
            performance: self.performance,
        }
    }
}

/// Shallow patch over a roster entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MemberPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_projects: Option<Vec<Id>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<i32>,
}

impl MemberPatch {
    /// Name and email must stay non-blank when the patch touches them
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if matches!(self.name.as_deref(), Some(n) if n.trim().is_empty()) {
            errors.add("name", "can't be blank");
        }
        if matches!(self.email.as_deref(), Some(e) if e.trim().is_empty()) {
            errors.add("email", "can't be blank");
        }
        errors.into_result()
    }

    pub fn apply_to(self, member: &mut TeamMember) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(email) = self.email {
            member.email = email;
        }
        if let Some(role) = self.role {
            member.role = role;
        }
        if let Some(department) = self.department {
            member.department = department;
        }
        if let Some(avatar) = self.avatar {
            member.avatar = avatar;
        }
        if let Some(phone) = self.phone {
            member.phone = Some(phone);
        }
        if let Some(skills) = self.skills {
            member.skills = skills;
        }
        if let Some(current_projects) = self.current_projects {
            member.current_projects = current_projects;
        }
        if let Some(workload) = self.workload {
            member.workload = workload;
        }
        if let Some(performance) = self.performance {
            member.performance = performance;
        }
    }
}
