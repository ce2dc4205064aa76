use actix_web::{HttpResponse, http::header, web};
use chrono::Utc;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::blocking;
use crate::config::VerificationMode;
use crate::error::ApiError;
use crate::model::attendance::{AttendanceRecord, NewAttendance};
use crate::service::{export, verification::CodeRegistry};
use crate::store::AttendanceRepository;

const READ_FAILED: &str = "Failed to read attendance data";
const ADD_FAILED: &str = "Failed to add attendance record";
const EXPORT_FAILED: &str = "Failed to export attendance data";

/// Optional narrowing of a course's records; blank values are ignored.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RecordFilter {
    /// Case-insensitive substring of the student ID
    #[schema(example = "S123")]
    pub search: Option<String>,
    /// Exact session type
    #[schema(example = "Lecture")]
    pub session_type: Option<String>,
    /// Exact status
    #[schema(example = "Present")]
    pub status: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RecordFilter {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        let search = non_blank(&self.search)
            .map(|s| record.student_id.to_lowercase().contains(&s.to_lowercase()))
            .unwrap_or(true);
        let session = non_blank(&self.session_type)
            .map(|s| record.session_type == s)
            .unwrap_or(true);
        let status = non_blank(&self.status)
            .map(|s| record.status == s)
            .unwrap_or(true);
        search && session && status
    }
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// Only records from the last N days; omit for all time
    #[schema(example = 7)]
    pub days: Option<u32>,
}

/// List every attendance record
#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "All records in submission order", body = [AttendanceRecord]),
        (status = 500, description = "Data file unreadable", body = crate::api::ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    store: web::Data<dyn AttendanceRepository>,
) -> Result<HttpResponse, ApiError> {
    let store = store.into_inner();
    let records = blocking(READ_FAILED, move || store.list()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// List one course's records, optionally searched and filtered
#[utoipa::path(
    get,
    path = "/api/attendance/{courseCode}",
    params(
        ("courseCode" = String, Path, description = "Course code", example = "CS101"),
        RecordFilter
    ),
    responses(
        (status = 200, description = "Matching records in submission order", body = [AttendanceRecord]),
        (status = 500, description = "Data file unreadable", body = crate::api::ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn list_course_attendance(
    store: web::Data<dyn AttendanceRepository>,
    path: web::Path<String>,
    filter: web::Query<RecordFilter>,
) -> Result<HttpResponse, ApiError> {
    let course_code = path.into_inner();
    let store = store.into_inner();

    let records = blocking(READ_FAILED, move || store.list_by_course(&course_code)).await?;
    let records: Vec<_> = records.into_iter().filter(|r| filter.matches(r)).collect();

    Ok(HttpResponse::Ok().json(records))
}

/// Submit attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body(
        content = NewAttendance,
        description = "Attendance submission; id and timestamp are filled when absent",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Stored record", body = AttendanceRecord),
        (status = 400, description = "Duplicate submission, invalid code or malformed body", body = crate::api::ErrorBody,
         example = json!({ "error": "Duplicate submission detected" })),
        (status = 429, description = "Too many submissions"),
        (status = 500, description = "Data file unreadable or unwritable", body = crate::api::ErrorBody)
    ),
    tag = "Attendance"
)]
#[tracing::instrument(
    name = "attendance_submit",
    skip(store, codes, payload),
    fields(student_id = %payload.student_id, course_code = %payload.course_code)
)]
pub async fn create_attendance(
    store: web::Data<dyn AttendanceRepository>,
    codes: web::Data<CodeRegistry>,
    payload: web::Json<NewAttendance>,
) -> Result<HttpResponse, ApiError> {
    let submission = payload.into_inner();

    if submission.student_id.trim().is_empty() || submission.course_code.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "studentId and courseCode must not be empty".to_string(),
        ));
    }

    let now = Utc::now();
    if codes.mode() == VerificationMode::Bound
        && !codes
            .verify(&submission.course_code, &submission.verification_code, now)
            .await
    {
        tracing::info!("Submission carried no live verification code");
        return Err(ApiError::InvalidVerificationCode);
    }

    let store = store.into_inner();
    let record = blocking(ADD_FAILED, move || store.append(submission, now)).await?;

    tracing::info!(id = %record.id, "Attendance recorded");
    Ok(HttpResponse::Created().json(record))
}

/// Download a course's records as CSV
#[utoipa::path(
    get,
    path = "/api/attendance/{courseCode}/export",
    params(
        ("courseCode" = String, Path, description = "Course code", example = "CS101"),
        ExportQuery
    ),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 500, description = "Data file unreadable", body = crate::api::ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn export_attendance(
    store: web::Data<dyn AttendanceRepository>,
    path: web::Path<String>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse, ApiError> {
    let course_code = path.into_inner();
    let store = store.into_inner();
    let now = Utc::now();

    let lookup = course_code.clone();
    let records = blocking(EXPORT_FAILED, move || store.list_by_course(&lookup)).await?;
    let records = export::within_days(records, query.days, now);

    tracing::debug!(course_code = %course_code, rows = records.len(), "Exporting attendance");
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export::file_name(&course_code, now)),
        ))
        .body(export::to_csv(&records)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed::sample_attendance;

    fn filter(search: &str, session: &str, status: &str) -> RecordFilter {
        let some = |s: &str| Some(s.to_string());
        RecordFilter {
            search: some(search),
            session_type: some(session),
            status: some(status),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let records = sample_attendance(Utc::now());
        assert!(records.iter().all(|r| RecordFilter::default().matches(r)));
        assert!(records.iter().all(|r| filter("", " ", "").matches(r)));
    }

    #[test]
    fn search_is_case_insensitive_substring_of_student_id() {
        let records = sample_attendance(Utc::now());
        let hits: Vec<_> = records
            .iter()
            .filter(|r| filter("s1234", "", "").matches(r))
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(hits, ["1", "2", "3", "4", "5"]);

        let hits: Vec<_> = records
            .iter()
            .filter(|r| filter("46", "", "").matches(r))
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(hits, ["2"]);
    }

    #[test]
    fn session_and_status_filters_are_exact() {
        let records = sample_attendance(Utc::now());
        let hits: Vec<_> = records
            .iter()
            .filter(|r| filter("", "Lecture", "Present").matches(r))
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(hits, ["1", "5"]);
        assert!(!records.iter().any(|r| filter("", "lecture", "").matches(r)));
    }
}
