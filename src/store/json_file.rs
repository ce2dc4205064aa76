use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, de::DeserializeOwned};

use super::{AttendanceRepository, CourseRepository, admit};
use crate::error::StoreError;
use crate::model::{
    attendance::{AttendanceRecord, NewAttendance},
    course::Course,
};

/// Attendance records kept as one pretty-printed JSON array on disk.
///
/// Every call re-reads the file. Appends hold `write_lock` across the
/// read, the duplicate check and the rewrite.
pub struct JsonFileAttendance {
    path: PathBuf,
    window: Duration,
    write_lock: Mutex<()>,
}

impl JsonFileAttendance {
    pub fn new(path: impl Into<PathBuf>, window: Duration) -> Self {
        Self {
            path: path.into(),
            window,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AttendanceRepository for JsonFileAttendance {
    fn list(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        read_json(&self.path)
    }

    fn append(&self, new: NewAttendance, now: DateTime<Utc>) -> Result<AttendanceRecord, StoreError> {
        // a poisoned lock only means another append panicked; the file is still whole
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut records: Vec<AttendanceRecord> = read_json(&self.path)?;
        let record = admit(&records, new, now, self.window)?;
        records.push(record.clone());
        write_json_atomic(&self.path, &records)?;

        tracing::debug!(
            id = %record.id,
            total = records.len(),
            path = %self.path.display(),
            "Attendance file rewritten"
        );
        Ok(record)
    }
}

/// Read-only course catalog file.
pub struct JsonFileCourses {
    path: PathBuf,
}

impl JsonFileCourses {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CourseRepository for JsonFileCourses {
    fn list(&self) -> Result<Vec<Course>, StoreError> {
        read_json(&self.path)
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Writes to a sibling temp file, then renames it over `path`.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let body = serde_json::to_vec_pretty(value)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&body)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
