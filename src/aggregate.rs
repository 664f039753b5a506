use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};

use crate::config::ReportConfig;
use crate::identity;
use crate::models::{AttendanceRow, DailyAttendance};

/// Session start format used by the platform's participant exports.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %I:%M:%S %p";

/// The header row is identified by its first column ending with this marker.
/// Matching on the suffix tolerates the stray invisible character the export
/// puts at the very start of the file.
pub const HEADER_MARKER: &str = "Name (Original Name)";

pub fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|field| field.ends_with(HEADER_MARKER))
}

/// Parse one data row of a participants export. Columns: 0 = display name,
/// 1 = email, 2 = session start timestamp, 4 = duration in minutes.
pub fn parse_record(record: &csv::StringRecord) -> anyhow::Result<AttendanceRow> {
    let field = |index: usize| {
        record
            .get(index)
            .with_context(|| format!("missing expected column {index}"))
    };

    let name = field(0)?.to_string();
    let email = field(1)?.to_lowercase();
    let start = field(2)?.to_string();
    let started_at = NaiveDateTime::parse_from_str(&start, TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid session start timestamp \"{start}\""))?;
    let raw_minutes = field(4)?;
    let minutes = raw_minutes
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid duration \"{raw_minutes}\""))?;

    Ok(AttendanceRow {
        name,
        email,
        start,
        started_at,
        minutes,
    })
}

/// Per-directory accumulation of attendance, keyed by resolved identity and
/// calendar date. Built fresh for every directory processed so runs stay
/// fully isolated from each other.
#[derive(Debug, Default)]
pub struct AttendanceLedger {
    participants: BTreeMap<String, BTreeMap<NaiveDate, DailyAttendance>>,
}

impl AttendanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one raw record into the ledger. The first record for an
    /// (identity, date) pair fixes the representative name, email and start
    /// timestamp; later records for the same pair only add their minutes.
    pub fn fold(&mut self, config: &ReportConfig, row: AttendanceRow) {
        let key = identity::identity_key(config, &row.email).to_string();
        let date = row.started_at.date();
        let days = self.participants.entry(key).or_default();

        match days.entry(date) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().minutes += row.minutes;
            }
            Entry::Vacant(slot) => {
                slot.insert(DailyAttendance {
                    name: row.name,
                    email: row.email,
                    start: row.start,
                    minutes: row.minutes,
                });
            }
        }
    }

    /// Participants in ascending identity-key order; each participant's days
    /// in ascending date order.
    pub fn participants(
        &self,
    ) -> impl Iterator<Item = (&String, &BTreeMap<NaiveDate, DailyAttendance>)> {
        self.participants.iter()
    }
}
