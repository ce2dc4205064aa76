//! Fixed sample data written on first start.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::json_file::write_json_atomic;
use crate::error::StoreError;
use crate::model::{attendance::AttendanceRecord, course::Course};

pub fn sample_attendance(now: DateTime<Utc>) -> Vec<AttendanceRecord> {
    let record = |id: &str, course: (&str, &str), days_ago: i64, session: &str, status: &str, code: &str, student: &str| {
        AttendanceRecord {
            id: id.to_string(),
            course_code: course.0.to_string(),
            course_name: course.1.to_string(),
            timestamp: now - Duration::days(days_ago),
            session_type: session.to_string(),
            status: status.to_string(),
            verification_code: code.to_string(),
            student_id: student.to_string(),
        }
    };
    let numerical = ("CS101", "Numerical Methods");
    let structures = ("CS102", "Data Structures");

    vec![
        record("1", numerical, 0, "Lecture", "Present", "5281", "S12345"),
        record("2", numerical, 1, "Lab", "Late", "1234", "S12346"),
        record("3", structures, 0, "Tutorial", "Present", "5678", "S12347"),
        record("4", structures, 2, "Lecture", "Excused", "9876", "S12348"),
        record("5", numerical, 3, "Lecture", "Present", "4321", "S12349"),
    ]
}

pub fn sample_courses() -> Vec<Course> {
    [
        ("CS101", "Numerical Methods", "Dr. Smith"),
        ("CS102", "Data Structures", "Prof. Johnson"),
        ("CS201", "Algorithms", "Dr. Williams"),
        ("CS202", "Database Systems", "Prof. Davis"),
        ("CS301", "Software Engineering", "Dr. Brown"),
    ]
    .into_iter()
    .map(|(code, name, lecturer)| Course {
        code: code.to_string(),
        name: name.to_string(),
        lecturer: lecturer.to_string(),
    })
    .collect()
}

/// Creates `data_dir` and writes each data file that does not exist yet.
/// Existing files are never touched.
pub fn seed_data_dir(data_dir: &Path, now: DateTime<Utc>) -> Result<(), StoreError> {
    fs::create_dir_all(data_dir)?;
    seed_file(&data_dir.join("attendance.json"), &sample_attendance(now))?;
    seed_file(&data_dir.join("courses.json"), &sample_courses())?;
    Ok(())
}

fn seed_file<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    if path.exists() {
        return Ok(());
    }
    write_json_atomic(path, rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Seeded data file");
    Ok(())
}
