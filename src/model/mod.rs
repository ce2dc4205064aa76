pub mod analytics;
pub mod attendance;
pub mod course;
pub mod verification;
