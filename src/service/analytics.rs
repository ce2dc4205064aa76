use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::analytics::{AnalyticsSummary, CourseSummary, SessionSummary, StatusTally, TrendPoint};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};

/// Rounds to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `present / total * 100`, or 0 for an empty set.
pub fn attendance_rate(present: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(present as f64 / total as f64 * 100.0)
}

/// Recomputes the admin summary from scratch.
pub fn summarize(records: &[AttendanceRecord]) -> AnalyticsSummary {
    let mut status_breakdown = BTreeMap::new();
    let mut course_breakdown = BTreeMap::new();
    let mut present = 0;

    for record in records {
        *status_breakdown.entry(record.status.clone()).or_insert(0) += 1;
        *course_breakdown.entry(record.course_code.clone()).or_insert(0) += 1;
        if record.known_status() == Some(AttendanceStatus::Present) {
            present += 1;
        }
    }

    AnalyticsSummary {
        total_submissions: records.len(),
        status_breakdown,
        course_breakdown,
        attendance_rate: attendance_rate(present, records.len()),
    }
}

impl StatusTally {
    fn count(&mut self, record: &AttendanceRecord) {
        self.total += 1;
        match record.known_status() {
            Some(AttendanceStatus::Present) => self.present += 1,
            Some(AttendanceStatus::Late) => self.late += 1,
            Some(AttendanceStatus::Excused) => self.excused += 1,
            None => {}
        }
    }

    pub fn of(records: &[AttendanceRecord]) -> Self {
        let mut tally = Self::default();
        records.iter().for_each(|r| tally.count(r));
        tally
    }

    pub fn rate(&self) -> f64 {
        attendance_rate(self.present, self.total)
    }
}

/// Groups by UTC calendar day, oldest first. The first record seen for a
/// day names the day's session type.
fn by_day(records: &[AttendanceRecord]) -> BTreeMap<NaiveDate, (String, StatusTally)> {
    let mut days: BTreeMap<NaiveDate, (String, StatusTally)> = BTreeMap::new();
    for record in records {
        days.entry(record.timestamp.date_naive())
            .or_insert_with(|| (record.session_type.clone(), StatusTally::default()))
            .1
            .count(record);
    }
    days
}

/// Lecturer view of one course. `records` should already be filtered to it.
pub fn course_summary(course_code: &str, records: &[AttendanceRecord]) -> CourseSummary {
    let tally = StatusTally::of(records);
    let sessions = by_day(records)
        .into_iter()
        .rev()
        .map(|(date, (session_type, tally))| SessionSummary {
            date,
            session_type,
            tally,
        })
        .collect();

    CourseSummary {
        course_code: course_code.to_string(),
        total_submissions: tally.total,
        present: tally.present,
        late: tally.late,
        excused: tally.excused,
        attendance_rate: tally.rate(),
        sessions,
    }
}

/// Daily attendance figures, oldest first.
pub fn trends(records: &[AttendanceRecord]) -> Vec<TrendPoint> {
    by_day(records)
        .into_iter()
        .map(|(date, (_, tally))| TrendPoint {
            date,
            attendance_rate: tally.rate(),
            tally,
        })
        .collect()
}
