use std::path::Path;

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::model::Project;

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

/// Export projects to a semicolon-delimited CSV file matching the import format.
///
/// Columns: Name ; Team ; Start Date ; End Date ; Status ; Description
/// Dates are formatted as DD/MM/YYYY; missing dates are left empty.
/// Returns the number of projects written.
pub fn export_csv(projects: &[Project], path: &Path) -> Result<usize, StoreError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)?;

    wtr.write_record(["Name", "Team", "Start Date", "End Date", "Status", "Description"])?;
    for project in projects {
        let start = format_date(project.start_date);
        let end = format_date(project.end_date);
        wtr.write_record([
            project.name.as_str(),
            project.team.as_str(),
            start.as_str(),
            end.as_str(),
            project.status.label(),
            project.description.as_str(),
        ])?;
    }

    wtr.flush().map_err(|e| StoreError::io(path, e))?;
    tracing::info!(path = %path.display(), projects = projects.len(), "csv exported");
    Ok(projects.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_import::parse_csv;
    use crate::model::ProjectStatus;

    #[test]
    fn exported_file_imports_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut dated = Project::new(
            "Ledger; v2",
            "Trading",
            NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 19).unwrap(),
        );
        dated.status = ProjectStatus::OnHold;
        let undated = Project::unscheduled("Someday", "Risk");

        assert_eq!(export_csv(&[dated.clone(), undated], &path).unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Name;Team;Start Date;End Date;Status;Description"));
        assert!(text.contains("05/03/2025;19/03/2025;On Hold"));

        let (store, skipped) = parse_csv(&text, "Round trip").unwrap();
        assert_eq!(skipped, 0);
        let back = &store.projects()[0];
        assert_eq!(back.name, dated.name);
        assert_eq!(back.start_date, dated.start_date);
        assert_eq!(back.end_date, dated.end_date);
        assert_eq!(back.status, ProjectStatus::OnHold);
        assert!(store.projects()[1].start_date.is_none());
    }
}
