use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::init_db;
use crate::error::StoreError;
use crate::service::verification::CodeRegistry;
use crate::store::{AttendanceRepository, CourseRepository};

/// Everything the handlers share, registered as app data by
/// [`crate::routes::configure`].
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub codes: CodeRegistry,
}

impl AppState {
    pub fn new(
        config: Config,
        attendance: Arc<dyn AttendanceRepository>,
        courses: Arc<dyn CourseRepository>,
    ) -> Self {
        let codes = CodeRegistry::new(
            config.verification_mode,
            Duration::from_secs(config.code_ttl_secs),
        );
        Self {
            config,
            attendance,
            courses,
            codes,
        }
    }

    /// File-backed state rooted at `config.data_dir`.
    pub fn open(config: Config) -> Result<Self, StoreError> {
        let (attendance, courses) = init_db(&config)?;
        Ok(Self::new(config, attendance, courses))
    }
}
