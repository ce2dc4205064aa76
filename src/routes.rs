use crate::{
    api::{analytics, attendance, courses, verification},
    state::AppState,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, error::InternalError, guard, web};
use serde_json::json;
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let burst = requests_per_min.max(1);
    let per_ms = 60_000 / burst as u64;
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms.max(1))
        .burst_size(burst)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

fn bad_request<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let message = err.to_string();
    tracing::debug!(error = %message, "Rejected request");
    InternalError::from_response(err, HttpResponse::BadRequest().json(json!({ "error": message })))
        .into()
}

/// Registers shared state, extractor error bodies and the API routes.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    let config = &state.config;

    cfg.app_data(web::Data::from(state.attendance.clone()))
        .app_data(web::Data::from(state.courses.clone()))
        .app_data(web::Data::new(state.codes.clone()))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| bad_request(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| bad_request(err)));

    let submit_limiter = Arc::new(build_limiter(config.rate_submit_per_min));
    let api_limiter = Arc::new(build_limiter(config.rate_api_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter)
            .service(
                web::scope("/attendance")
                    // POST /attendance, rate limited on its own
                    .service(
                        web::resource("")
                            .guard(guard::Post())
                            .wrap(submit_limiter)
                            .route(web::post().to(attendance::create_attendance)),
                    )
                    // GET /attendance
                    .service(web::resource("").route(web::get().to(attendance::list_attendance)))
                    // /attendance/{courseCode}
                    .service(
                        web::resource("/{courseCode}")
                            .route(web::get().to(attendance::list_course_attendance)),
                    )
                    // /attendance/{courseCode}/export
                    .service(
                        web::resource("/{courseCode}/export")
                            .route(web::get().to(attendance::export_attendance)),
                    ),
            )
            .service(web::resource("/courses").route(web::get().to(courses::list_courses)))
            .service(web::resource("/verify").route(web::post().to(verification::verify_code)))
            .service(
                web::resource("/generate-code")
                    .route(web::post().to(verification::generate_verification_code)),
            )
            .service(
                web::scope("/analytics")
                    .service(web::resource("").route(web::get().to(analytics::overall)))
                    .service(
                        web::resource("/{courseCode}").route(web::get().to(analytics::course_summary)),
                    )
                    .service(
                        web::resource("/{courseCode}/trends")
                            .route(web::get().to(analytics::course_trends)),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::{MemoryAttendance, MemoryCourses};
    use actix_web::{App, http::StatusCode, test};
    use chrono::Duration;

    #[::core::prelude::v1::test]
    fn limiter_builds_for_extreme_rates() {
        build_limiter(0);
        build_limiter(1);
        build_limiter(u32::MAX);
    }

    #[actix_web::test]
    async fn submissions_past_the_burst_are_throttled() {
        let config = Config {
            rate_submit_per_min: 1,
            ..Config::default()
        };
        let attendance = Arc::new(MemoryAttendance::new(Vec::new(), Duration::minutes(5)));
        let state = AppState::new(config, attendance, Arc::new(MemoryCourses::new(Vec::new())));
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, &state))).await;

        let submit = |student: &str| {
            test::TestRequest::post()
                .uri("/api/attendance")
                .peer_addr("127.0.0.1:40001".parse().unwrap())
                .set_json(json!({ "studentId": student, "courseCode": "CS101" }))
                .to_request()
        };

        let first = test::call_service(&app, submit("S1")).await;
        assert_eq!(first.status(), StatusCode::CREATED);
        let second = test::call_service(&app, submit("S2")).await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
