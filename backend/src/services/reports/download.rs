use super::pdf::{self, PdfError};
use crate::config::Config;
use crate::report_store::ReportStore;
use crate::services::upload::secure_filename;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use log::error;

pub(crate) async fn student(
    path: web::Path<(String, usize)>,
    store: web::Data<ReportStore>,
    config: web::Data<Config>,
) -> HttpResponse {
    let (report_id, index) = path.into_inner();
    let Some(results) = store.get(&report_id).await else {
        return HttpResponse::NotFound().body("Report not found");
    };
    let Some(student) = results.results.get(index) else {
        return HttpResponse::NotFound().body("Student not found");
    };

    let filename = feedback_filename(&student.filename);
    let fonts = config.pdf_fonts.clone();
    let built = tokio::task::spawn_blocking(move || pdf::student_feedback_pdf(&fonts, &results, index)).await;
    respond(built, &filename)
}

pub(crate) async fn summary(
    report_id: web::Path<String>,
    store: web::Data<ReportStore>,
    config: web::Data<Config>,
) -> HttpResponse {
    let Some(results) = store.get(&report_id.into_inner()).await else {
        return HttpResponse::NotFound().body("Report not found");
    };

    let fonts = config.pdf_fonts.clone();
    let built = tokio::task::spawn_blocking(move || pdf::class_summary_pdf(&fonts, &results)).await;
    respond(built, "class_summary.pdf")
}

/// `alice.pdf` becomes `alice_feedback.pdf`.
pub fn feedback_filename(student_filename: &str) -> String {
    let safe = secure_filename(student_filename);
    let stem = match safe.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => safe.as_str(),
    };
    format!("{}_feedback.pdf", stem)
}

fn respond(
    built: Result<Result<Vec<u8>, PdfError>, tokio::task::JoinError>,
    filename: &str,
) -> HttpResponse {
    match built {
        Ok(Ok(bytes)) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ))
            .body(bytes),
        Ok(Err(e)) => {
            error!("PDF generation failed for {}: {}", filename, e);
            HttpResponse::ServiceUnavailable().body(format!("PDF generation failed: {}", e))
        }
        Err(e) => {
            error!("PDF worker failed for {}: {}", filename, e);
            HttpResponse::InternalServerError().body("PDF generation failed")
        }
    }
}
