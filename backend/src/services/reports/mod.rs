//! PDF downloads for a report that was just shown.
//!
//! - `GET /api/reports/{report_id}/students/{index}`: feedback for the student
//!   at `index` (input order), as `{stem}_feedback.pdf`.
//! - `GET /api/reports/{report_id}/summary`: class average and class feedback,
//!   as `class_summary.pdf`.
//!
//! `report_id` comes from the report page; results are kept in `ReportStore`
//! only for the configured time-to-live, after which both routes answer 404.
//! Missing font files answer `503 Service Unavailable`.

mod download;
mod pdf;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/reports";

/// Path of the PDF for the student at `index`.
pub fn student_pdf_path(report_id: &str, index: usize) -> String {
    format!("{}/{}/students/{}", API_PATH, report_id, index)
}

pub fn summary_pdf_path(report_id: &str) -> String {
    format!("{}/{}/summary", API_PATH, report_id)
}

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/{report_id}/students/{index}", get().to(download::student))
        .route("/{report_id}/summary", get().to(download::summary))
}
