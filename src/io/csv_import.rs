use std::path::Path;

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::model::{Project, ProjectStatus, ProjectStore};
use crate::ui::theme;

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Team,
    Start,
    End,
    Status,
    Description,
}

/// Match a header flexibly: case, spaces, hyphens and underscores are ignored.
fn header_to_column(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match normalized.as_str() {
        "name" | "project" | "projectname" | "title" | "label" | "initiative" => Some(Column::Name),
        "team" | "teamname" | "lane" | "owner" | "group" | "squad" => Some(Column::Team),
        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Some(Column::End),
        "status" | "state" | "stage" => Some(Column::Status),
        "description" | "notes" | "note" | "details" | "comment" | "comments" => {
            Some(Column::Description)
        }
        _ => None,
    }
}

fn cell<'r>(record: &'r csv::StringRecord, columns: &[Option<Column>], wanted: Column) -> &'r str {
    columns
        .iter()
        .position(|c| *c == Some(wanted))
        .and_then(|idx| record.get(idx))
        .unwrap_or("")
}

/// Import projects from a CSV file into a fresh store named after the file.
/// Returns the store and the number of skipped rows.
pub fn import_csv(path: &Path) -> Result<(ProjectStore, usize), StoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Imported Roadmap");
    let (store, skipped) = parse_csv(&content, name)?;
    tracing::info!(
        path = %path.display(),
        projects = store.projects().len(),
        skipped,
        "csv imported"
    );
    Ok((store, skipped))
}

/// Parse CSV text. Teams are created in order of first appearance.
pub fn parse_csv(content: &str, store_name: &str) -> Result<(ProjectStore, usize), StoreError> {
    let first_line = content.lines().next().unwrap_or("");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(first_line))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(header_to_column).collect();
    let has = |c: Column| columns.contains(&Some(c));
    if !has(Column::Name) || !has(Column::Team) {
        return Err(StoreError::MissingColumns(
            headers.iter().map(str::to_string).collect(),
        ));
    }

    let palette = theme::TEAM_COLORS;
    let mut store = ProjectStore::new(store_name);
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping unreadable csv row");
                skipped += 1;
                continue;
            }
        };

        let field = |wanted: Column| cell(&record, &columns, wanted);

        let name = field(Column::Name);
        let team = field(Column::Team);
        if name.is_empty() || team.is_empty() {
            tracing::warn!(line, "skipping row without name or team");
            skipped += 1;
            continue;
        }

        let mut dates = [None, None];
        let mut bad_date = false;
        for (slot, column) in dates.iter_mut().zip([Column::Start, Column::End]) {
            let raw = field(column);
            if raw.is_empty() {
                continue;
            }
            match parse_date(raw) {
                Some(date) => *slot = Some(date),
                None => {
                    tracing::warn!(line, value = raw, "skipping row with invalid date");
                    bad_date = true;
                }
            }
        }
        if bad_date {
            skipped += 1;
            continue;
        }

        let color = palette[store.teams().len() % palette.len()];
        store.ensure_team(team, color);
        // Team names differing only in case share the first lane.
        let lane = store
            .teams()
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(team))
            .map(|t| t.name.clone())
            .unwrap_or_else(|| team.to_string());

        let mut project = Project::unscheduled(name, lane);
        project.start_date = dates[0];
        project.end_date = dates[1];
        project.status = ProjectStatus::parse(field(Column::Status)).unwrap_or_default();
        project.description = field(Column::Description).to_string();
        store.add_project(project)?;
    }

    if store.projects().is_empty() {
        return Err(StoreError::NoRows { skipped });
    }
    Ok((store, skipped))
}
