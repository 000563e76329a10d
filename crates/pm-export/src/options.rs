//! Export slice selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use pm_models::{MilestoneKey, Project, TeamMember};

/// One selectable part of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportSlice {
    Projects,
    TeamMembers,
    Milestones,
    Requirements,
    Updates,
    Risks,
}

impl ExportSlice {
    pub const ALL: [ExportSlice; 6] = [
        ExportSlice::Projects,
        ExportSlice::TeamMembers,
        ExportSlice::Milestones,
        ExportSlice::Requirements,
        ExportSlice::Updates,
        ExportSlice::Risks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::TeamMembers => "teamMembers",
            Self::Milestones => "milestones",
            Self::Requirements => "requirements",
            Self::Updates => "updates",
            Self::Risks => "risks",
        }
    }
}

impl fmt::Display for ExportSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportSlice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|slice| slice.as_str().to_lowercase() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown export slice '{}', expected one of: projects, team-members, milestones, requirements, updates, risks",
                    s
                )
            })
    }
}

/// Which slices to include; everything by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub projects: bool,
    pub team_members: bool,
    pub milestones: bool,
    pub requirements: bool,
    pub updates: bool,
    pub risks: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::all()
    }
}

impl ExportOptions {
    pub fn all() -> Self {
        Self {
            projects: true,
            team_members: true,
            milestones: true,
            requirements: true,
            updates: true,
            risks: true,
        }
    }

    pub fn none() -> Self {
        Self {
            projects: false,
            team_members: false,
            milestones: false,
            requirements: false,
            updates: false,
            risks: false,
        }
    }

    /// Exactly the given slices
    pub fn only(slices: impl IntoIterator<Item = ExportSlice>) -> Self {
        let mut options = Self::none();
        for slice in slices {
            options.set(slice, true);
        }
        options
    }

    pub fn set(&mut self, slice: ExportSlice, enabled: bool) {
        match slice {
            ExportSlice::Projects => self.projects = enabled,
            ExportSlice::TeamMembers => self.team_members = enabled,
            ExportSlice::Milestones => self.milestones = enabled,
            ExportSlice::Requirements => self.requirements = enabled,
            ExportSlice::Updates => self.updates = enabled,
            ExportSlice::Risks => self.risks = enabled,
        }
    }

    pub fn includes(&self, slice: ExportSlice) -> bool {
        match slice {
            ExportSlice::Projects => self.projects,
            ExportSlice::TeamMembers => self.team_members,
            ExportSlice::Milestones => self.milestones,
            ExportSlice::Requirements => self.requirements,
            ExportSlice::Updates => self.updates,
            ExportSlice::Risks => self.risks,
        }
    }

    pub fn is_empty(&self) -> bool {
        !ExportSlice::ALL.into_iter().any(|s| self.includes(s))
    }

    /// Number of records the selected slices would produce
    pub fn item_count(&self, projects: &[Project], members: &[TeamMember]) -> usize {
        let per_project = |f: fn(&Project) -> usize| projects.iter().map(f).sum::<usize>();
        let mut count = 0;
        if self.projects {
            count += projects.len();
        }
        if self.team_members {
            count += members.len();
        }
        if self.milestones {
            count += projects.len() * MilestoneKey::ALL.len();
        }
        if self.requirements {
            count += per_project(|p| p.requirements.len());
        }
        if self.updates {
            count += per_project(|p| p.updates.len());
        }
        if self.risks {
            count += per_project(|p| p.risks.len());
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_models::seed;

    #[test]
    fn test_parse_slice() {
        assert_eq!("team-members".parse::<ExportSlice>(), Ok(ExportSlice::TeamMembers));
        assert_eq!("teamMembers".parse::<ExportSlice>(), Ok(ExportSlice::TeamMembers));
        assert_eq!("RISKS".parse::<ExportSlice>(), Ok(ExportSlice::Risks));
        assert!("budget".parse::<ExportSlice>().is_err());
    }

    #[test]
    fn test_only() {
        let options = ExportOptions::only([ExportSlice::Projects, ExportSlice::Risks]);
        assert!(options.includes(ExportSlice::Projects));
        assert!(options.includes(ExportSlice::Risks));
        assert!(!options.includes(ExportSlice::Milestones));
        assert!(ExportOptions::none().is_empty());
    }

    #[test]
    fn test_item_count() {
        let projects = seed::default_projects();
        let members = seed::default_team_members();

        // 1 project + 5 members + 6 milestones + 3 requirements + 0 updates + 2 risks
        assert_eq!(ExportOptions::all().item_count(&projects, &members), 17);
        assert_eq!(
            ExportOptions::only([ExportSlice::Milestones]).item_count(&projects, &members),
            6
        );
    }
}
