use std::path::{Path, PathBuf};

use anyhow::Context;
use walkdir::WalkDir;

use crate::aggregate;
use crate::models::{AttendanceRow, DailyAttendance, PivotTable, ReportSet};

pub const REPORT_FILE: &str = "meeting-report.csv";
pub const REPORT_BY_DATE_FILE: &str = "meeting-report-by-date.csv";
pub const REPORT_BY_WEEK_FILE: &str = "meeting-report-by-week.csv";

/// Find the participants*.csv exports sitting directly in `dir`, sorted by
/// path so processing order is deterministic.
pub fn discover_participant_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry =
            entry.with_context(|| format!("failed to scan directory {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with("participants") && name.ends_with(".csv") {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Materialize one export file as parsed attendance rows, skipping header
/// rows. Any malformed data row fails the whole file, with the file and row
/// position attached for the operator.
pub fn read_attendance_rows(path: &Path) -> anyhow::Result<Vec<AttendanceRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("failed to read {} row {}", path.display(), index + 1))?;
        if aggregate::is_header(&record) {
            continue;
        }
        let row = aggregate::parse_record(&record)
            .with_context(|| format!("{} row {}", path.display(), index + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write the three report files into the directory the exports came from.
pub fn write_reports(dir: &Path, reports: &ReportSet) -> anyhow::Result<()> {
    write_chronological(&dir.join(REPORT_FILE), &reports.chronological)?;
    write_table(&dir.join(REPORT_BY_DATE_FILE), &reports.by_date)?;
    write_table(&dir.join(REPORT_BY_WEEK_FILE), &reports.by_week)?;
    Ok(())
}

fn write_chronological(path: &Path, rows: &[DailyAttendance]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for day in rows {
        let minutes = day.minutes.to_string();
        writer.write_record([
            day.name.as_str(),
            day.email.as_str(),
            day.start.as_str(),
            minutes.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_table(path: &Path, table: &PivotTable) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
