mod config;
mod job_controller;
mod marking;
mod report_store;
mod services;

use crate::config::Config;
use crate::job_controller::retention::start_retention_sweeper;
use crate::job_controller::state::{start_job_updater, JobsState};
use crate::marking::{HttpMarker, Marker};
use crate::report_store::ReportStore;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info};
use mime_guess::from_path;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    let url = config.url();

    if config.open_browser {
        let url = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url);
        });
    }

    let (jobs_state, rx) = JobsState::new();
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        start_job_updater(updater_state, rx).await;
    });

    let reports = ReportStore::new();
    tokio::spawn(start_retention_sweeper(
        jobs_state.clone(),
        reports.clone(),
        config.result_ttl,
    ));

    let marker: Arc<dyn Marker> = Arc::new(HttpMarker::new(config.marking_service_url.clone()));
    let marker = web::Data::from(marker);

    info!("Marking service at {}", config.marking_service_url);
    info!("Server running at {}", url);

    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(web::Data::new(jobs_state.clone()))
            .app_data(web::Data::new(reports.clone()))
            .app_data(marker.clone())
            .service(services::options::configure_routes())
            .service(services::jobs::configure_routes())
            .service(services::reports::configure_routes())
            .service(services::upload::configure_routes())
            .default_service(web::route().to(serve_embedded))
    })
    .bind(bind)?
    .run()
    .await
}
