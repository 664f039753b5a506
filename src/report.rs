use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};

use crate::aggregate::AttendanceLedger;
use crate::config::ReportConfig;
use crate::identity;
use crate::models::{DailyAttendance, LowAttendanceWarning, PivotTable, ReportSet};

/// Derive the three report views and the low-attendance warnings from a
/// completed ledger. Excluded identities appear in none of them. A threshold
/// of 0 disables the warnings, since every participant in the ledger has at
/// least one attended date.
pub fn build_reports(
    ledger: &AttendanceLedger,
    config: &ReportConfig,
    warning_threshold: u32,
) -> ReportSet {
    let mut chronological = Vec::new();
    let mut warnings = Vec::new();

    for (_, days) in included(ledger, config) {
        chronological.extend(days.values().cloned());

        if days.len() <= warning_threshold as usize {
            if let Some(first) = days.values().next() {
                warnings.push(LowAttendanceWarning {
                    name: first.name.clone(),
                    email: first.email.clone(),
                    sessions: days.len(),
                });
            }
        }
    }

    ReportSet {
        chronological,
        by_date: date_pivot(ledger, config),
        by_week: week_pivot(ledger, config),
        warnings,
    }
}

fn included<'a>(
    ledger: &'a AttendanceLedger,
    config: &'a ReportConfig,
) -> impl Iterator<Item = (&'a String, &'a BTreeMap<NaiveDate, DailyAttendance>)> {
    ledger
        .participants()
        .filter(move |(key, _)| !identity::is_excluded(config, key))
}

/// Table of participants vs dates attended. An empty cell means no
/// attendance on that date, as opposed to an explicit 0.
fn date_pivot(ledger: &AttendanceLedger, config: &ReportConfig) -> PivotTable {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    for (_, days) in included(ledger, config) {
        dates.extend(days.keys().copied());
    }

    let mut header = vec!["Name".to_string(), "Email".to_string()];
    header.extend(dates.iter().map(|date| date.to_string()));

    let mut rows = Vec::new();
    for (key, days) in included(ledger, config) {
        let Some(first) = days.values().next() else {
            continue;
        };
        let mut row = vec![first.name.clone(), key.clone()];
        for date in &dates {
            row.push(
                days.get(date)
                    .map(|day| day.minutes.to_string())
                    .unwrap_or_default(),
            );
        }
        rows.push(row);
    }

    PivotTable { header, rows }
}

/// Table of participants vs ISO weeks attended, with each column headed by
/// the Monday of its week. Buckets are keyed by the full (year, week) pair
/// so the same week number in two different years stays separate.
fn week_pivot(ledger: &AttendanceLedger, config: &ReportConfig) -> PivotTable {
    let mut weeks: BTreeMap<(i32, u32), NaiveDate> = BTreeMap::new();
    for (_, days) in included(ledger, config) {
        for date in days.keys() {
            let iso = date.iso_week();
            weeks
                .entry((iso.year(), iso.week()))
                .or_insert_with(|| monday_of_week(*date));
        }
    }

    let mut header = vec!["Name".to_string(), "Email".to_string()];
    header.extend(weeks.values().map(|monday| monday.to_string()));

    let mut rows = Vec::new();
    for (key, days) in included(ledger, config) {
        let Some(first) = days.values().next() else {
            continue;
        };
        let mut row = vec![first.name.clone(), key.clone()];
        for week in weeks.keys() {
            let total: u32 = days
                .iter()
                .filter(|(date, _)| {
                    let iso = date.iso_week();
                    (iso.year(), iso.week()) == *week
                })
                .map(|(_, day)| day.minutes)
                .sum();
            row.push(if total > 0 {
                total.to_string()
            } else {
                String::new()
            });
        }
        rows.push(row);
    }

    PivotTable { header, rows }
}

fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
