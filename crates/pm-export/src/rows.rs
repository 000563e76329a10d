//! Flattened export rows
//!
//! A sub-record of a project (milestone, requirement, update, risk) is
//! exported as one flat object: the parent's `projectId` and `projectName`
//! followed by the sub-record's own fields.

use pm_core::traits::Id;
use pm_models::{Milestone, MilestoneKey, Project};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRow<T> {
    pub project_id: Id,
    pub project_name: String,
    #[serde(flatten)]
    pub item: T,
}

impl<T> ProjectRow<T> {
    pub fn new(project: &Project, item: T) -> Self {
        Self {
            project_id: project.id,
            project_name: project.name.clone(),
            item,
        }
    }
}

/// Milestone together with its key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneEntry {
    pub milestone_name: MilestoneKey,
    #[serde(flatten)]
    pub milestone: Milestone,
}

/// Flatten one nested sequence of every project
pub fn flatten<T, I>(projects: &[Project], items: impl Fn(&Project) -> I) -> Vec<ProjectRow<T>>
where
    I: IntoIterator<Item = T>,
{
    projects
        .iter()
        .flat_map(|project| {
            items(project)
                .into_iter()
                .map(move |item| ProjectRow::new(project, item))
        })
        .collect()
}

pub fn milestone_rows(projects: &[Project]) -> Vec<ProjectRow<MilestoneEntry>> {
    flatten(projects, |p| {
        p.milestones
            .iter()
            .map(|(key, milestone)| MilestoneEntry {
                milestone_name: key,
                milestone: milestone.clone(),
            })
            .collect::<Vec<_>>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_models::seed;

    #[test]
    fn test_milestone_rows_are_flat() {
        let projects = seed::default_projects();
        let rows = milestone_rows(&projects);
        assert_eq!(rows.len(), 6);

        let json = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(json["projectId"], 1);
        assert_eq!(json["projectName"], "E-commerce Platform Upgrade");
        assert_eq!(json["milestoneName"], "techReview");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["plannedDate"], "2024-01-23");
        assert!(json.get("milestone").is_none());
    }

    #[test]
    fn test_requirement_rows_keep_parent() {
        let projects = seed::default_projects();
        let rows = flatten(&projects, |p| p.requirements.clone());
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.project_id == 1));

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Mobile wallet integration");
    }
}
