//! Whole-store export and import
//!
//! A snapshot is one JSON object holding every collection:
//!
//! ```json
//! { "projects": [...], "settings": {...}, "teamMembers": [...], "exportDate": "..." }
//! ```
//!
//! Import is all-or-nothing with respect to validation: the whole document is
//! checked before the first write. Keys missing from the document (or set to
//! `null`) leave the corresponding collection untouched.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use pm_core::config::Settings;
use pm_core::error::ValidationErrors;
use pm_core::traits::{ids_unique, Identifiable};
use pm_models::{Project, TeamMember};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::collection::Collection;
use crate::error::{StoreError, StoreResult};
use crate::storage::Storage;
use crate::store::PersistentStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub settings: Settings,
    pub team_members: Vec<TeamMember>,
    pub export_date: DateTime<Utc>,
}

/// What an import replaced; `None`/`false` means the key was absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub projects: Option<usize>,
    pub team_members: Option<usize>,
    pub settings: bool,
}

impl ImportSummary {
    pub fn is_empty(&self) -> bool {
        self.projects.is_none() && self.team_members.is_none() && !self.settings
    }
}

/// Validated snapshot content, ready to be written
#[derive(Default)]
struct Staged {
    projects: Option<Vec<Project>>,
    team_members: Option<Vec<TeamMember>>,
    settings: Option<Settings>,
}

impl<S: Storage> PersistentStore<S> {
    /// Current content of every collection, stamped with `at`
    pub fn snapshot(&self, at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            projects: self.get_collection(Collection::Projects),
            settings: self.get_settings(),
            team_members: self.get_collection(Collection::TeamMembers),
            export_date: at,
        }
    }

    /// Pretty-printed snapshot of every collection
    pub fn export_all(&self) -> StoreResult<String> {
        self.export_all_at(Utc::now())
    }

    pub fn export_all_at(&self, at: DateTime<Utc>) -> StoreResult<String> {
        serde_json::to_string_pretty(&self.snapshot(at)).map_err(|source| {
            StoreError::Serialization {
                collection: Collection::Projects,
                source,
            }
        })
    }

    /// Replace collections from a snapshot document
    ///
    /// Fails with `MalformedSnapshot` when the text is not JSON and with
    /// `InvalidSnapshot` when any present collection does not validate; in
    /// both cases nothing is written.
    #[instrument(skip(self, json), fields(bytes = json.len()))]
    pub fn import_all(&self, json: &str) -> StoreResult<ImportSummary> {
        let document: Value = serde_json::from_str(json).map_err(StoreError::MalformedSnapshot)?;
        let staged = stage(document).map_err(StoreError::InvalidSnapshot)?;

        let mut summary = ImportSummary::default();
        if let Some(projects) = staged.projects {
            self.try_save_collection(Collection::Projects, &projects)?;
            summary.projects = Some(projects.len());
        }
        if let Some(settings) = staged.settings {
            self.try_save_settings(&settings)?;
            summary.settings = true;
        }
        if let Some(members) = staged.team_members {
            self.try_save_collection(Collection::TeamMembers, &members)?;
            summary.team_members = Some(members.len());
        }

        if summary.is_empty() {
            warn!("Snapshot contained no known collections");
        } else {
            info!(
                projects = ?summary.projects,
                team_members = ?summary.team_members,
                settings = summary.settings,
                "Snapshot imported"
            );
        }
        Ok(summary)
    }
}

fn stage(document: Value) -> Result<Staged, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Value::Object(mut fields) = document else {
        errors.add_base("snapshot must be a JSON object");
        return Err(errors);
    };

    let mut staged = Staged::default();

    if let Some(value) = take_present(&mut fields, Collection::Projects) {
        if let Some(projects) = parse_records::<Project>(Collection::Projects, value, &mut errors) {
            check_unique_ids(Collection::Projects, &projects, &mut errors);
            for project in &projects {
                let mut seen = HashSet::new();
                if !project.requirements.iter().all(|r| seen.insert(r.id())) {
                    errors.add(
                        Collection::Projects.snapshot_field(),
                        format!("project {} has duplicate requirement ids", project.id),
                    );
                }
            }
            staged.projects = Some(projects);
        }
    }

    if let Some(value) = take_present(&mut fields, Collection::TeamMembers) {
        if let Some(members) = parse_records::<TeamMember>(Collection::TeamMembers, value, &mut errors) {
            check_unique_ids(Collection::TeamMembers, &members, &mut errors);
            staged.team_members = Some(members);
        }
    }

    if let Some(value) = take_present(&mut fields, Collection::Settings) {
        match value {
            Value::Object(map) => staged.settings = Some(Settings::from(map)),
            _ => errors.add(Collection::Settings.snapshot_field(), "must be an object"),
        }
    }

    errors.into_result().map(|_| staged)
}

fn take_present(fields: &mut Map<String, Value>, collection: Collection) -> Option<Value> {
    match fields.remove(collection.snapshot_field()) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value),
    }
}

fn parse_records<T: DeserializeOwned>(
    collection: Collection,
    value: Value,
    errors: &mut ValidationErrors,
) -> Option<Vec<T>> {
    let field = collection.snapshot_field();
    let Value::Array(items) = value else {
        errors.add(field, "must be an array");
        return None;
    };

    let mut records = Vec::with_capacity(items.len());
    let mut failed = false;
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                errors.add(field, format!("[{}] {}", index, e));
                failed = true;
            }
        }
    }
    (!failed).then_some(records)
}

fn check_unique_ids<T: Identifiable>(collection: Collection, records: &[T], errors: &mut ValidationErrors) {
    if !ids_unique(records) {
        errors.add(collection.snapshot_field(), "contains duplicate ids");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use pm_models::seed;

    fn seeded() -> PersistentStore<MemoryStorage> {
        let store = PersistentStore::new(MemoryStorage::new(), "pm");
        store.save_collection(Collection::Projects, &seed::default_projects());
        store.save_collection(Collection::TeamMembers, &seed::default_team_members());
        let mut settings = Settings::new();
        settings.set("theme", "dark");
        store.save_settings(&settings);
        store
    }

    #[test]
    fn test_export_contains_every_collection() {
        let store = seeded();
        let json = store.export_all().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["projects"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["teamMembers"].as_array().map(Vec::len), Some(5));
        assert_eq!(value["settings"]["theme"], "dark");
        assert!(value["exportDate"].is_string());
        // Pretty-printed
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_export_then_import_restores_state() {
        let source = seeded();
        let json = source.export_all().unwrap();

        let target = PersistentStore::new(MemoryStorage::new(), "pm");
        let summary = target.import_all(&json).unwrap();
        assert_eq!(summary.projects, Some(1));
        assert_eq!(summary.team_members, Some(5));
        assert!(summary.settings);

        let projects: Vec<Project> = target.get_collection(Collection::Projects);
        assert_eq!(projects, seed::default_projects());
        assert_eq!(target.get_settings(), source.get_settings());
    }

    #[test]
    fn test_import_leaves_absent_keys_untouched() {
        let store = seeded();
        let summary = store.import_all(r#"{"projects": []}"#).unwrap();
        assert_eq!(summary.projects, Some(0));
        assert_eq!(summary.team_members, None);
        assert!(!summary.settings);

        let projects: Vec<Project> = store.get_collection(Collection::Projects);
        assert!(projects.is_empty());
        let members: Vec<TeamMember> = store.get_collection(Collection::TeamMembers);
        assert_eq!(members.len(), 5);
        assert_eq!(store.get_settings().get_string("theme"), Some("dark"));
    }

    #[test]
    fn test_import_null_key_is_absent() {
        let store = seeded();
        let summary = store.import_all(r#"{"teamMembers": null}"#).unwrap();
        assert!(summary.is_empty());
        let members: Vec<TeamMember> = store.get_collection(Collection::TeamMembers);
        assert_eq!(members.len(), 5);
    }

    #[test]
    fn test_import_malformed_json_writes_nothing() {
        let store = seeded();
        let before = store.version(Collection::Projects);

        let err = store.import_all("{\"projects\": [").unwrap_err();
        assert!(matches!(err, StoreError::MalformedSnapshot(_)));
        assert_eq!(store.version(Collection::Projects), before);
    }

    #[test]
    fn test_import_rejects_duplicate_ids_before_writing() {
        let store = seeded();
        let mut projects = seed::default_projects();
        projects.push(projects[0].clone());
        let document = serde_json::json!({
            "projects": projects,
            "teamMembers": [],
        });

        let err = store.import_all(&document.to_string()).unwrap_err();
        let StoreError::InvalidSnapshot(errors) = err else {
            panic!("expected InvalidSnapshot, got {err:?}");
        };
        assert!(errors.has_error("projects"));

        // Valid teamMembers were not written either
        let members: Vec<TeamMember> = store.get_collection(Collection::TeamMembers);
        assert_eq!(members.len(), 5);
    }

    #[test]
    fn test_import_rejects_wrong_shapes() {
        let store = seeded();

        let err = store.import_all("[1, 2]").unwrap_err();
        assert!(matches!(err, StoreError::InvalidSnapshot(_)));

        let err = store
            .import_all(r#"{"projects": {"id": 1}, "settings": [1]}"#)
            .unwrap_err();
        let StoreError::InvalidSnapshot(errors) = err else {
            panic!("expected InvalidSnapshot");
        };
        assert!(errors.has_error("projects"));
        assert!(errors.has_error("settings"));
    }

    #[test]
    fn test_import_rejects_unknown_milestone_key() {
        let store = seeded();
        let mut value = serde_json::to_value(seed::default_projects()).unwrap();
        value[0]["milestones"]["retro"] = serde_json::json!({
            "status": "pending",
            "date": null,
            "plannedDate": "2024-04-01",
            "owner": "x"
        });
        let document = serde_json::json!({ "projects": value });

        assert!(store.import_all(&document.to_string()).is_err());
    }
}
