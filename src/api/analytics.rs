use actix_web::{HttpResponse, web};

use super::blocking;
use crate::error::ApiError;
use crate::model::analytics::{AnalyticsSummary, CourseSummary, TrendPoint};
use crate::service::analytics;
use crate::store::AttendanceRepository;

const ANALYTICS_FAILED: &str = "Failed to generate analytics";

/// Aggregate statistics over every record
#[utoipa::path(
    get,
    path = "/api/analytics",
    responses(
        (status = 200, description = "Counts and attendance rate", body = AnalyticsSummary),
        (status = 500, description = "Data file unreadable", body = crate::api::ErrorBody)
    ),
    tag = "Analytics"
)]
pub async fn overall(store: web::Data<dyn AttendanceRepository>) -> Result<HttpResponse, ApiError> {
    let store = store.into_inner();
    let records = blocking(ANALYTICS_FAILED, move || store.list()).await?;
    let summary: AnalyticsSummary = analytics::summarize(&records);
    Ok(HttpResponse::Ok().json(summary))
}

/// Class summary for one course
#[utoipa::path(
    get,
    path = "/api/analytics/{courseCode}",
    params(("courseCode" = String, Path, description = "Course code", example = "CS101")),
    responses(
        (status = 200, description = "Status counts and per-day sessions", body = CourseSummary),
        (status = 500, description = "Data file unreadable", body = crate::api::ErrorBody)
    ),
    tag = "Analytics"
)]
pub async fn course_summary(
    store: web::Data<dyn AttendanceRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let course_code = path.into_inner();
    let store = store.into_inner();

    let lookup = course_code.clone();
    let records = blocking(ANALYTICS_FAILED, move || store.list_by_course(&lookup)).await?;
    let summary: CourseSummary = analytics::course_summary(&course_code, &records);
    Ok(HttpResponse::Ok().json(summary))
}

/// Daily attendance trend for one course
#[utoipa::path(
    get,
    path = "/api/analytics/{courseCode}/trends",
    params(("courseCode" = String, Path, description = "Course code", example = "CS101")),
    responses(
        (status = 200, description = "One point per day, oldest first", body = [TrendPoint]),
        (status = 500, description = "Data file unreadable", body = crate::api::ErrorBody)
    ),
    tag = "Analytics"
)]
pub async fn course_trends(
    store: web::Data<dyn AttendanceRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let course_code = path.into_inner();
    let store = store.into_inner();

    let records = blocking(ANALYTICS_FAILED, move || store.list_by_course(&course_code)).await?;
    let points: Vec<TrendPoint> = analytics::trends(&records);
    Ok(HttpResponse::Ok().json(points))
}
