//! Full-fidelity JSON export

use chrono::{DateTime, Utc};
use pm_models::{Project, ProjectUpdate, Requirement, Risk, TeamMember};
use serde::{Deserialize, Serialize};

use crate::error::ExportResult;
use crate::options::ExportOptions;
use crate::rows::{flatten, milestone_rows, MilestoneEntry, ProjectRow};

pub const EXPORT_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    pub export_date: DateTime<Utc>,
    pub version: String,
    pub total_projects: usize,
    pub total_team_members: usize,
}

/// Export file content; unselected slices are omitted entirely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_members: Option<Vec<TeamMember>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestones: Option<Vec<ProjectRow<MilestoneEntry>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<ProjectRow<Requirement>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updates: Option<Vec<ProjectRow<ProjectUpdate>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks: Option<Vec<ProjectRow<Risk>>>,
    pub export_info: ExportInfo,
}

pub fn build_export(
    options: &ExportOptions,
    projects: &[Project],
    members: &[TeamMember],
    at: DateTime<Utc>,
) -> ExportDocument {
    ExportDocument {
        projects: options.projects.then(|| projects.to_vec()),
        team_members: options.team_members.then(|| members.to_vec()),
        milestones: options.milestones.then(|| milestone_rows(projects)),
        requirements: options
            .requirements
            .then(|| flatten(projects, |p| p.requirements.clone())),
        updates: options.updates.then(|| flatten(projects, |p| p.updates.clone())),
        risks: options.risks.then(|| flatten(projects, |p| p.risks.clone())),
        export_info: ExportInfo {
            export_date: at,
            version: EXPORT_FORMAT_VERSION.to_string(),
            total_projects: projects.len(),
            total_team_members: members.len(),
        },
    }
}

/// Pretty-printed export document
pub fn export_json(
    options: &ExportOptions,
    projects: &[Project],
    members: &[TeamMember],
    at: DateTime<Utc>,
) -> ExportResult<String> {
    let document = build_export(options, projects, members, at);
    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ExportSlice;
    use chrono::TimeZone;
    use pm_models::seed;
    use serde_json::Value;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_full_export() {
        let projects = seed::default_projects();
        let members = seed::default_team_members();
        let json = export_json(&ExportOptions::all(), &projects, &members, at()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["projects"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["teamMembers"].as_array().map(Vec::len), Some(5));
        assert_eq!(value["milestones"].as_array().map(Vec::len), Some(6));
        assert_eq!(value["requirements"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["updates"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["risks"][1]["projectName"], "E-commerce Platform Upgrade");
        assert_eq!(value["risks"][1]["level"], "Low");

        let info = &value["exportInfo"];
        assert_eq!(info["version"], "1.0");
        assert_eq!(info["totalProjects"], 1);
        assert_eq!(info["totalTeamMembers"], 5);
        assert_eq!(info["exportDate"], "2024-03-01T09:30:00Z");
        assert!(json.contains("\n  \"projects\""));
    }

    #[test]
    fn test_unselected_slices_are_omitted() {
        let projects = seed::default_projects();
        let options = ExportOptions::only([ExportSlice::Requirements]);
        let document = build_export(&options, &projects, &[], at());

        let value = serde_json::to_value(&document).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert!(value.get("requirements").is_some());
        assert!(value.get("projects").is_none());
        assert_eq!(value["exportInfo"]["totalTeamMembers"], 0);
    }

    #[test]
    fn test_update_rows_use_type_key() {
        let mut projects = seed::default_projects();
        projects[0].updates.push(ProjectUpdate {
            id: 1_709_285_400_000,
            author: "Ada".to_string(),
            date: at().date_naive(),
            content: "Shipped".to_string(),
            kind: ProjectUpdate::KIND_UPDATE.to_string(),
        });
        let document = build_export(&ExportOptions::all(), &projects, &[], at());
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["updates"][0]["type"], "update");
        assert_eq!(value["updates"][0]["projectId"], 1);
    }
}
