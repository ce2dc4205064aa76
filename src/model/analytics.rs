use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// Admin dashboard figures over every stored record.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "totalSubmissions": 5,
    "statusBreakdown": { "Present": 3, "Late": 1, "Excused": 1 },
    "courseBreakdown": { "CS101": 3, "CS102": 2 },
    "attendanceRate": 60.0
}))]
pub struct AnalyticsSummary {
    pub total_submissions: usize,
    pub status_breakdown: BTreeMap<String, usize>,
    pub course_breakdown: BTreeMap<String, usize>,
    /// Percentage of `Present` records, two decimals
    pub attendance_rate: f64,
}

/// Status counts for a set of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusTally {
    pub total: usize,
    pub present: usize,
    pub late: usize,
    pub excused: usize,
}

/// One calendar day of a course, as shown in the lecturer's class summary.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    #[schema(value_type = String, format = "date", example = "2026-01-01")]
    pub date: NaiveDate,
    #[schema(example = "Lecture")]
    pub session_type: String,
    #[serde(flatten)]
    pub tally: StatusTally,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    #[schema(example = "CS101")]
    pub course_code: String,
    pub total_submissions: usize,
    pub present: usize,
    pub late: usize,
    pub excused: usize,
    pub attendance_rate: f64,
    /// Newest day first
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    #[schema(value_type = String, format = "date", example = "2026-01-01")]
    pub date: NaiveDate,
    #[serde(flatten)]
    pub tally: StatusTally,
    pub attendance_rate: f64,
}
