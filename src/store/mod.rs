//! Record and course repositories.
//!
//! Handlers only see the traits; the flat JSON files are one adapter, the
//! in-memory vectors are another.

pub mod json_file;
pub mod memory;
pub mod seed;

use chrono::{DateTime, Duration, Utc};

use crate::error::StoreError;
use crate::model::{
    attendance::{AttendanceRecord, NewAttendance},
    course::Course,
};

pub use json_file::{JsonFileAttendance, JsonFileCourses};
pub use memory::{MemoryAttendance, MemoryCourses};

pub trait AttendanceRepository: Send + Sync {
    /// Every record, in submission order.
    fn list(&self) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Records whose `course_code` equals `code`, relative order preserved.
    fn list_by_course(&self, code: &str) -> Result<Vec<AttendanceRecord>, StoreError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| record.course_code == code)
            .collect())
    }

    /// Stores a submission unless it collides with a recent one.
    /// Read, duplicate check and write happen as one unit.
    fn append(&self, new: NewAttendance, now: DateTime<Utc>) -> Result<AttendanceRecord, StoreError>;
}

pub trait CourseRepository: Send + Sync {
    fn list(&self) -> Result<Vec<Course>, StoreError>;
}

/// Fills the server-side defaults and applies the duplicate-submission rule
/// against `existing`.
///
/// A prior record collides when it has the same student and course and its
/// timestamp is later than `now - window`.
pub fn admit(
    existing: &[AttendanceRecord],
    new: NewAttendance,
    now: DateTime<Utc>,
    window: Duration,
) -> Result<AttendanceRecord, StoreError> {
    let record = new.into_record(now);
    let cutoff = now - window;

    let duplicate = existing.iter().find(|prior| {
        prior.student_id == record.student_id
            && prior.course_code == record.course_code
            && prior.timestamp > cutoff
    });

    match duplicate {
        Some(prior) => {
            tracing::info!(
                student_id = %record.student_id,
                course_code = %record.course_code,
                prior_id = %prior.id,
                "Duplicate submission rejected"
            );
            Err(StoreError::DuplicateSubmission)
        }
        None => Ok(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
    }

    fn prior(student: &str, course: &str, at: DateTime<Utc>) -> AttendanceRecord {
        AttendanceRecord {
            id: format!("{student}-{course}"),
            course_code: course.into(),
            course_name: String::new(),
            timestamp: at,
            session_type: "Lecture".into(),
            status: "Present".into(),
            verification_code: "1234".into(),
            student_id: student.into(),
        }
    }

    fn submission(student: &str, course: &str) -> NewAttendance {
        NewAttendance {
            id: None,
            course_code: course.into(),
            course_name: String::new(),
            timestamp: None,
            session_type: "Lecture".into(),
            status: "Present".into(),
            verification_code: "1234".into(),
            student_id: student.into(),
        }
    }

    #[test]
    fn same_student_and_course_inside_window_is_rejected() {
        let existing = vec![prior("S1", "CS101", now() - Duration::minutes(2))];
        let result = admit(&existing, submission("S1", "CS101"), now(), Duration::minutes(5));
        assert!(matches!(result, Err(StoreError::DuplicateSubmission)));
    }

    #[test]
    fn same_pair_older_than_window_is_accepted() {
        let existing = vec![prior("S1", "CS101", now() - Duration::minutes(6))];
        let record = admit(&existing, submission("S1", "CS101"), now(), Duration::minutes(5)).unwrap();
        assert_eq!(record.timestamp, now());
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let existing = vec![prior("S1", "CS101", now() - Duration::minutes(5))];
        assert!(admit(&existing, submission("S1", "CS101"), now(), Duration::minutes(5)).is_ok());
    }

    #[test]
    fn other_student_or_other_course_does_not_collide() {
        let existing = vec![
            prior("S2", "CS101", now()),
            prior("S1", "CS102", now()),
        ];
        assert!(admit(&existing, submission("S1", "CS101"), now(), Duration::minutes(5)).is_ok());
    }

    #[test]
    fn future_dated_prior_record_still_blocks() {
        let existing = vec![prior("S1", "CS101", now() + Duration::hours(1))];
        let result = admit(&existing, submission("S1", "CS101"), now(), Duration::minutes(5));
        assert!(matches!(result, Err(StoreError::DuplicateSubmission)));
    }
}
