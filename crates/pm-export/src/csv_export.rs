//! Projects-only CSV export
//!
//! Every field is double-quoted with embedded quotes doubled, rows are
//! separated by `\n`, and the text starts with a UTF-8 byte-order mark so
//! spreadsheet applications detect the encoding.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use pm_models::Project;

use crate::error::ExportResult;

pub const BOM: char = '\u{feff}';

pub const CSV_HEADER: [&str; 11] = [
    "ID",
    "Name",
    "Description",
    "Status",
    "Priority",
    "Category",
    "Progress",
    "Start Date",
    "End Date",
    "Owner",
    "Last Update",
];

fn row(project: &Project) -> [String; 11] {
    [
        project.id.to_string(),
        project.name.clone(),
        project.description.clone(),
        project.status.clone(),
        project.priority.to_string(),
        project.category.clone(),
        project.progress.to_string(),
        project.start_date.format("%Y-%m-%d").to_string(),
        project.end_date.format("%Y-%m-%d").to_string(),
        project.owner.name.clone(),
        project.last_update.format("%Y-%m-%d").to_string(),
    ]
}

/// Header plus one row per project, BOM-prefixed
pub fn export_csv(projects: &[Project]) -> ExportResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for project in projects {
        writer.write_record(row(project))?;
    }

    let mut bytes = writer.into_inner().map_err(|e| e.into_error())?;
    // Rows are joined, not terminated
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }

    let body = String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(format!("{}{}", BOM, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_models::seed;

    #[test]
    fn test_header_and_bom() {
        let csv = export_csv(&[]).unwrap();
        assert!(csv.starts_with('\u{feff}'));
        assert_eq!(
            csv.trim_start_matches(BOM),
            "\"ID\",\"Name\",\"Description\",\"Status\",\"Priority\",\"Category\",\"Progress\",\"Start Date\",\"End Date\",\"Owner\",\"Last Update\""
        );
    }

    #[test]
    fn test_row_fields() {
        let csv = export_csv(&seed::default_projects()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("\"1\",\"E-commerce Platform Upgrade\","));
        assert!(lines[1].ends_with(
            "\"High\",\"Product Development\",\"65\",\"2024-01-15\",\"2024-03-30\",\"Zhang San\",\"2024-02-15\""
        ));
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let mut projects = seed::default_projects();
        projects[0].name = "He said \"hi\"".to_string();
        projects[0].description = "line one\nline two, with comma".to_string();

        let csv = export_csv(&projects).unwrap();
        assert!(csv.contains(",\"He said \"\"hi\"\"\","));
        assert!(csv.contains("\"line one\nline two, with comma\""));
    }
}
