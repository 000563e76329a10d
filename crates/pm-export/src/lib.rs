//! # pm-export
//!
//! Turns the cached collections into downloadable files and reads a JSON
//! snapshot back into the store.
//!
//! - `options` - which slices an export includes
//! - `rows` - sub-records flattened with their parent project's id and name
//! - `json` - the full-fidelity export document
//! - `csv_export` - the projects-only spreadsheet export
//! - `files` - file naming, writing exports to disk, importing from disk

pub mod error;
pub mod options;
pub mod rows;
pub mod json;
pub mod csv_export;
pub mod files;

pub use error::{ExportError, ExportResult};
pub use options::{ExportOptions, ExportSlice};
pub use rows::{MilestoneEntry, ProjectRow};
pub use json::{build_export, export_json, ExportDocument, ExportInfo, EXPORT_FORMAT_VERSION};
pub use csv_export::{export_csv, CSV_HEADER};
pub use files::{csv_file_name, import_file, json_file_name, write_csv_export, write_json_export};
