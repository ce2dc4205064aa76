use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

use super::{AttendanceRepository, CourseRepository, admit};
use crate::error::StoreError;
use crate::model::{
    attendance::{AttendanceRecord, NewAttendance},
    course::Course,
};

/// Attendance records held in process memory only.
pub struct MemoryAttendance {
    records: RwLock<Vec<AttendanceRecord>>,
    window: Duration,
}

impl MemoryAttendance {
    pub fn new(records: Vec<AttendanceRecord>, window: Duration) -> Self {
        Self {
            records: RwLock::new(records),
            window,
        }
    }
}

impl AttendanceRepository for MemoryAttendance {
    fn list(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.clone())
    }

    fn append(&self, new: NewAttendance, now: DateTime<Utc>) -> Result<AttendanceRecord, StoreError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let record = admit(&records, new, now, self.window)?;
        records.push(record.clone());
        Ok(record)
    }
}

pub struct MemoryCourses {
    courses: Vec<Course>,
}

impl MemoryCourses {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }
}

impl CourseRepository for MemoryCourses {
    fn list(&self) -> Result<Vec<Course>, StoreError> {
        Ok(self.courses.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    #[test]
    fn list_by_course_keeps_relative_order() {
        let now = Utc::now();
        let store = MemoryAttendance::new(seed::sample_attendance(now), Duration::minutes(5));

        let all = store.list().unwrap();
        let cs101 = store.list_by_course("CS101").unwrap();

        let expected: Vec<_> = all.into_iter().filter(|r| r.course_code == "CS101").collect();
        assert_eq!(cs101, expected);
        let ids: Vec<_> = cs101.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "5"]);
    }

    #[test]
    fn unknown_course_filters_to_empty() {
        let store = MemoryAttendance::new(seed::sample_attendance(Utc::now()), Duration::minutes(5));
        assert!(store.list_by_course("CS999").unwrap().is_empty());
    }

    #[test]
    fn seeded_student_cannot_resubmit_immediately() {
        let now = Utc::now();
        let store = MemoryAttendance::new(seed::sample_attendance(now), Duration::minutes(5));
        let again = NewAttendance {
            id: None,
            course_code: "CS101".into(),
            course_name: "Numerical Methods".into(),
            timestamp: None,
            session_type: "Lecture".into(),
            status: "Present".into(),
            verification_code: "5281".into(),
            student_id: "S12345".into(),
        };

        assert!(matches!(store.append(again, now), Err(StoreError::DuplicateSubmission)));
        assert_eq!(store.list().unwrap().len(), 5);
    }
}
