//! Export files on disk and JSON import from disk

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use pm_models::{Project, TeamMember};
use pm_store::{ImportSummary, PersistentStore, Storage};
use tracing::{info, instrument, warn};

use crate::csv_export::export_csv;
use crate::error::{ExportError, ExportResult};
use crate::json::export_json;
use crate::options::ExportOptions;

pub fn json_file_name(date: NaiveDate) -> String {
    format!("project-management-export-{}.json", date.format("%Y-%m-%d"))
}

pub fn csv_file_name(date: NaiveDate) -> String {
    format!("projects-{}.csv", date.format("%Y-%m-%d"))
}

/// Write the JSON export into `dir`, returning the file's path
#[instrument(skip(options, projects, members), fields(dir = %dir.display()))]
pub fn write_json_export(
    dir: &Path,
    options: &ExportOptions,
    projects: &[Project],
    members: &[TeamMember],
    at: DateTime<Utc>,
) -> ExportResult<PathBuf> {
    let content = export_json(options, projects, members, at)?;
    let path = dir.join(json_file_name(at.date_naive()));
    fs::create_dir_all(dir)?;
    fs::write(&path, content)?;
    info!(path = %path.display(), projects = projects.len(), "JSON export written");
    Ok(path)
}

/// Write the projects CSV into `dir`, returning the file's path
#[instrument(skip(projects), fields(dir = %dir.display()))]
pub fn write_csv_export(dir: &Path, projects: &[Project], date: NaiveDate) -> ExportResult<PathBuf> {
    let content = export_csv(projects)?;
    let path = dir.join(csv_file_name(date));
    fs::create_dir_all(dir)?;
    fs::write(&path, content)?;
    info!(path = %path.display(), rows = projects.len(), "CSV export written");
    Ok(path)
}

/// Import a JSON snapshot file into the store
///
/// Only files whose extension maps to `application/json` are accepted.
/// Repositories holding a cached copy must be reloaded afterwards.
#[instrument(skip(store), fields(path = %path.display()))]
pub fn import_file<S: Storage>(store: &PersistentStore<S>, path: &Path) -> ExportResult<ImportSummary> {
    let detected = mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    if detected != "application/json" {
        warn!(detected = %detected, "Rejected non-JSON import");
        return Err(ExportError::UnsupportedFileType {
            path: path.to_path_buf(),
            detected,
        });
    }

    let content = fs::read_to_string(path)?;
    let summary = store.import_all(&content)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pm_models::seed;
    use pm_store::{Collection, MemoryStorage};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_file_names() {
        assert_eq!(json_file_name(date()), "project-management-export-2024-03-01.json");
        assert_eq!(csv_file_name(date()), "projects-2024-03-01.csv");
    }

    #[test]
    fn test_write_exports() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");
        let projects = seed::default_projects();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let json_path =
            write_json_export(&out, &ExportOptions::all(), &projects, &[], at).unwrap();
        assert_eq!(json_path, out.join("project-management-export-2024-03-01.json"));
        assert!(fs::read_to_string(&json_path).unwrap().contains("\"exportInfo\""));

        let csv_path = write_csv_export(&out, &projects, date()).unwrap();
        let bytes = fs::read(&csv_path).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
    }

    #[test]
    fn test_import_rejects_non_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.csv");
        fs::write(&path, "{}").unwrap();

        let store = PersistentStore::new(MemoryStorage::new(), "pm");
        let err = import_file(&store, &path).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFileType { .. }));
    }

    #[test]
    fn test_import_snapshot_file() {
        let source = PersistentStore::new(MemoryStorage::new(), "pm");
        source.save_collection(Collection::Projects, &seed::default_projects());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        fs::write(&path, source.export_all().unwrap()).unwrap();

        let target = PersistentStore::new(MemoryStorage::new(), "pm");
        let summary = import_file(&target, &path).unwrap();
        assert_eq!(summary.projects, Some(1));

        let projects: Vec<Project> = target.get_collection(Collection::Projects);
        assert_eq!(projects, seed::default_projects());
    }

    #[test]
    fn test_import_invalid_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ nope").unwrap();

        let store = PersistentStore::new(MemoryStorage::new(), "pm");
        let err = import_file(&store, &path).unwrap_err();
        assert!(matches!(err, ExportError::Import(_)));
    }
}
