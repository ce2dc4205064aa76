use std::borrow::Cow;

use chrono::{DateTime, Duration, Utc};

use crate::model::attendance::AttendanceRecord;

const HEADER: [&str; 5] = ["Student ID", "Date", "Time", "Session Type", "Status"];

/// Keeps records stamped within the last `days` days, up to `now`.
/// `None` keeps everything. A window reaching past the earliest
/// representable instant keeps every record up to `now`.
pub fn within_days(records: Vec<AttendanceRecord>, days: Option<u32>, now: DateTime<Utc>) -> Vec<AttendanceRecord> {
    match days {
        None => records,
        Some(days) => {
            let start = Duration::try_days(i64::from(days)).and_then(|span| now.checked_sub_signed(span));
            records
                .into_iter()
                .filter(|r| start.is_none_or(|start| r.timestamp >= start) && r.timestamp <= now)
                .collect()
        }
    }
}

fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Renders the lecturer download: one row per record, UTC date and time.
pub fn to_csv(records: &[AttendanceRecord]) -> String {
    let mut out = HEADER.join(",");
    for record in records {
        let date = record.timestamp.format("%Y-%m-%d").to_string();
        let time = record.timestamp.format("%H:%M:%S").to_string();
        let row = [
            escape(&record.student_id),
            Cow::Owned(date),
            Cow::Owned(time),
            escape(&record.session_type),
            escape(&record.status),
        ];
        out.push('\n');
        out.push_str(&row.join(","));
    }
    out
}

pub fn file_name(course_code: &str, now: DateTime<Utc>) -> String {
    let safe: String = course_code
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("attendance_{}_{}.csv", safe, now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed::sample_attendance;
    use chrono::TimeZone;

    #[test]
    fn csv_has_header_and_one_row_per_record() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 9, 5, 30).unwrap();
        let csv = to_csv(&sample_attendance(now)[..2]);

        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "Student ID,Date,Time,Session Type,Status");
        assert_eq!(lines[1], "S12345,2026-02-10,09:05:30,Lecture,Present");
        assert_eq!(lines[2], "S12346,2026-02-09,09:05:30,Lab,Late");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn fields_with_separators_are_quoted() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn day_window_drops_old_and_future_records() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap();
        let mut records = sample_attendance(now);
        records[2].timestamp = now + Duration::hours(1);

        let kept = within_days(records.clone(), Some(2), now);
        let ids: Vec<_> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "4"]);

        assert_eq!(within_days(records, None, now).len(), 5);
    }

    #[test]
    fn window_past_the_calendar_range_keeps_everything_up_to_now() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap();
        let mut records = sample_attendance(now);
        records[2].timestamp = now + Duration::hours(1);

        let kept = within_days(records, Some(u32::MAX), now);
        let ids: Vec<_> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "4", "5"]);
    }

    #[test]
    fn file_name_is_dated_and_sanitised() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap();
        assert_eq!(file_name("CS101", now), "attendance_CS101_2026-02-10.csv");
        assert_eq!(file_name("CS 1/01", now), "attendance_CS_1_01_2026-02-10.csv");
    }
}
