use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::config::Config;
use crate::error::StoreError;
use crate::store::{AttendanceRepository, CourseRepository, JsonFileAttendance, JsonFileCourses, seed};

/// Seeds the data directory on first run and opens the file-backed
/// repositories.
pub fn init_db(
    config: &Config,
) -> Result<(Arc<dyn AttendanceRepository>, Arc<dyn CourseRepository>), StoreError> {
    seed::seed_data_dir(&config.data_dir, Utc::now())?;

    let attendance = JsonFileAttendance::new(
        config.attendance_file(),
        Duration::seconds(config.duplicate_window_secs),
    );
    let courses = JsonFileCourses::new(config.courses_file());

    Ok((Arc::new(attendance), Arc::new(courses)))
}
