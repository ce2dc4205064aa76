use actix_cors::Cors;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;

use attendance_tracker::config::Config;
use attendance_tracker::docs::ApiDoc;
use attendance_tracker::routes;
use attendance_tracker::state::AppState;

use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance tracker is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "attendance.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(
        data_dir = %config.data_dir.display(),
        verification_mode = ?config.verification_mode,
        "Server starting..."
    );

    let state = AppState::open(config.clone())
        .with_context(|| format!("failed to prepare data directory {}", config.data_dir.display()))?;

    let server_addr = config.server_addr.clone();
    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .wrap(Cors::permissive())
            .service(
                // wildcard {_:.*} matches the UI's JS/CSS files
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .service(index)
            .configure(|cfg| routes::configure(cfg, &state))
    })
    .bind(&server_addr)?
    .run()
    .await?;

    Ok(())
}
