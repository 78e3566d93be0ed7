//! # Upload Service
//!
//! `POST /upload` receives the marking form as `multipart/form-data`.
//!
//! ## Workflow
//!
//! 1. `intake::read_submission` streams the body into a `SubmissionRequest`
//!    and re-checks every rule the form enforces in the browser (closed sets,
//!    mark scheme plus at least one student file, delivery option and e-mail).
//!    Any violation is answered with `400 Bad Request` and a plain-text reason.
//!
//! 2. When the teacher asked to see results on the website, the request is
//!    sent to the marking service and the returned `ResultSet` is rendered as
//!    the report page (`200 OK`). The results are also kept in `ReportStore`
//!    so the page can link to PDF exports under `/api/reports`. A failing or malformed answer from the
//!    marking service is a `502 Bad Gateway`.
//!
//! 3. Otherwise (e-mail only) a background job is scheduled through
//!    `JobsState` and the handler answers `202 Accepted` at once; the marking
//!    service e-mails the results itself.

mod intake;
mod job;
mod page;

pub(crate) use intake::secure_filename;

use crate::config::Config;
use crate::job_controller::state::JobsState;
use crate::marking::{Marker, MarkingError};
use crate::report_store::ReportStore;
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::web::{self, post};
use actix_web::{HttpResponse, Resource, Responder};
use common::form::UPLOAD_ACTION;
use common::model::results::RenderingInputError;
use common::model::submission::{DeliveryOption, SubmissionError, UnknownValue};
use common::report::render_report;
use log::{error, info, warn};
use thiserror::Error;

/// Everything that can stop an upload from producing a response page.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Error reading upload: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),
    #[error("Upload exceeds the {} limit.", describe_limit(.limit_bytes))]
    TooLarge { limit_bytes: usize },
    #[error("Field '{0}' is not valid UTF-8.")]
    NotUtf8(&'static str),
    #[error(transparent)]
    UnknownValue(#[from] UnknownValue),
    #[error(transparent)]
    Invalid(#[from] SubmissionError),
    #[error("Marking failed: {0}")]
    Marking(#[from] MarkingError),
    #[error("Marking service returned unusable results: {0}")]
    Rendering(#[from] RenderingInputError),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Marking(_) | UploadError::Rendering(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Whole mebibytes read as "N MB", anything else as an exact byte count.
fn describe_limit(bytes: &usize) -> String {
    let bytes = *bytes;
    const MB: usize = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else {
        format!("{} bytes", bytes)
    }
}

pub fn configure_routes() -> Resource {
    web::resource(UPLOAD_ACTION).route(post().to(process))
}

pub(crate) async fn process(
    payload: Multipart,
    config: web::Data<Config>,
    jobs: web::Data<JobsState>,
    reports: web::Data<ReportStore>,
    marker: web::Data<dyn Marker>,
) -> impl Responder {
    match handle_upload(payload, &config, &jobs, &reports, marker).await {
        Ok(response) => response,
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                error!("Upload failed: {}", e);
            } else {
                warn!("Upload rejected: {}", e);
            }
            HttpResponse::build(status)
                .content_type("text/plain; charset=utf-8")
                .body(e.to_string())
        }
    }
}

async fn handle_upload(
    payload: Multipart,
    config: &Config,
    jobs: &JobsState,
    reports: &ReportStore,
    marker: web::Data<dyn Marker>,
) -> Result<HttpResponse, UploadError> {
    let request = intake::read_submission(payload, config.max_upload_bytes).await?;
    info!(
        "Accepted {} student file(s) for {} {} ({})",
        request.student_files.len(),
        request.level,
        request.subject,
        request.exam_board
    );

    if request.wants(DeliveryOption::Website) {
        let results = marker.mark(&request).await?;
        let mut body = render_report(&results)?;
        let filenames: Vec<String> = results.results.iter().map(|r| r.filename.clone()).collect();
        let report_id = reports.insert(results).await;
        body.push_str(&page::downloads_section(&report_id, &filenames));
        return Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page::render_page("Marking Results", &body)));
    }

    let job_id = job::schedule_marking_job(jobs, marker.into_inner(), request).await;
    info!("Scheduled e-mail marking job {}", job_id);
    Ok(HttpResponse::Accepted()
        .content_type("text/html; charset=utf-8")
        .body(page::emailed_page(&job_id)))
}
