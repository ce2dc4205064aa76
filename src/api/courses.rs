use actix_web::{HttpResponse, web};

use super::blocking;
use crate::error::ApiError;
use crate::model::course::Course;
use crate::store::CourseRepository;

/// List the course catalog
#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "Every course", body = [Course]),
        (status = 500, description = "Course file unreadable", body = crate::api::ErrorBody)
    ),
    tag = "Courses"
)]
pub async fn list_courses(courses: web::Data<dyn CourseRepository>) -> Result<HttpResponse, ApiError> {
    let courses = courses.into_inner();
    let list: Vec<Course> = blocking("Failed to read courses data", move || courses.list()).await?;
    Ok(HttpResponse::Ok().json(list))
}
