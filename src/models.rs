use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct AttendanceRow {
    pub name: String,
    pub email: String,
    pub start: String,
    pub started_at: NaiveDateTime,
    pub minutes: u32,
}

/// One participant's fused attendance for a single calendar date.
/// Name, email and start keep the values of the first record folded in;
/// minutes accumulates across every record for the same identity and date.
#[derive(Debug, Clone)]
pub struct DailyAttendance {
    pub name: String,
    pub email: String,
    pub start: String,
    pub minutes: u32,
}

#[derive(Debug, Clone)]
pub struct PivotTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct LowAttendanceWarning {
    pub name: String,
    pub email: String,
    pub sessions: usize,
}

#[derive(Debug, Clone)]
pub struct ReportSet {
    pub chronological: Vec<DailyAttendance>,
    pub by_date: PivotTable,
    pub by_week: PivotTable,
    pub warnings: Vec<LowAttendanceWarning>,
}

#[derive(Debug, Clone)]
pub struct AliasCandidate {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct AliasSuggestion {
    pub name: String,
    pub email: String,
    pub matches: Vec<AliasCandidate>,
}
