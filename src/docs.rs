use crate::api::ErrorBody;
use crate::api::attendance::{ExportQuery, RecordFilter};
use crate::api::verification::{
    GenerateCodeRequest, GenerateCodeResponse, VerifyRequest, VerifyResponse,
};
use crate::model::analytics::{
    AnalyticsSummary, CourseSummary, SessionSummary, StatusTally, TrendPoint,
};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, NewAttendance, SessionType};
use crate::model::course::Course;
use crate::model::verification::IssuedCode;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Classroom Attendance API",
        version = "0.1.0",
        description = r#"
## Classroom Attendance Tracker

Students submit attendance through a code-verified form, lecturers generate
verification codes and review per-course analytics, and an admin views
aggregate statistics.

### Key Features
- **Attendance**
  - Submit, list, search and export attendance records
  - Re-submission by the same student for the same course within the
    duplicate window is rejected
- **Verification**
  - Generate 4-digit codes, check codes before submitting
- **Analytics**
  - Overall counts and attendance rate, per-course class summary and daily trends

### Response Format
- JSON bodies; errors are `{"error": "..."}`
- CSV for the export endpoint
"#,
    ),
    paths(
        crate::api::attendance::list_attendance,
        crate::api::attendance::list_course_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::export_attendance,

        crate::api::courses::list_courses,

        crate::api::verification::verify_code,
        crate::api::verification::generate_verification_code,

        crate::api::analytics::overall,
        crate::api::analytics::course_summary,
        crate::api::analytics::course_trends
    ),
    components(
        schemas(
            AttendanceRecord,
            NewAttendance,
            AttendanceStatus,
            SessionType,
            RecordFilter,
            ExportQuery,
            Course,
            VerifyRequest,
            VerifyResponse,
            GenerateCodeRequest,
            GenerateCodeResponse,
            IssuedCode,
            AnalyticsSummary,
            StatusTally,
            SessionSummary,
            CourseSummary,
            TrendPoint,
            ErrorBody
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance submission and records"),
        (name = "Courses", description = "Course catalog"),
        (name = "Verification", description = "Verification codes"),
        (name = "Analytics", description = "Attendance statistics"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/attendance",
            "/api/attendance/{courseCode}",
            "/api/attendance/{courseCode}/export",
            "/api/courses",
            "/api/verify",
            "/api/generate-code",
            "/api/analytics",
            "/api/analytics/{courseCode}",
            "/api/analytics/{courseCode}/trends",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
