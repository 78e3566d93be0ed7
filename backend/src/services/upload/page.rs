//! HTML shells around the report body and the e-mail acknowledgement.

use crate::services::reports::{student_pdf_path, summary_pdf_path};
use common::markdown::escape_html;

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; margin: 0 auto; max-width: 1200px; padding: 24px; color: #222; }
.report-header .context { color: #555; }
section { margin-bottom: 32px; }
.side-by-side { display: flex; gap: 24px; align-items: flex-start; }
.side-by-side > div { flex: 1; min-width: 0; }
.original { background: #fafafa; padding: 12px; border-radius: 4px; }
.part { border-left: 4px solid #1976d2; padding-left: 12px; margin-bottom: 16px; }
.downloads ul { padding-left: 20px; }
.class-average { font-size: 1.25rem; font-weight: bold; }
pre { white-space: pre-wrap; }
"#;

/// Wraps an already-safe HTML body into a complete document.
pub fn render_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}<p><a href=\"/\">Mark another set of papers</a></p>\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

/// Answer to an e-mail-only submission that was queued for marking.
pub fn emailed_page(job_id: &str) -> String {
    render_page(
        "Feedback on its way",
        &format!(
            "<h2>Feedback is being emailed to you.</h2>\n<p>Thank you! You\u{2019}ll receive your results shortly.</p>\n<p class=\"job\">Reference: <code>{}</code></p>\n",
            escape_html(job_id)
        ),
    )
}

/// Links to the PDF exports of a stored report, one per student in input order.
pub fn downloads_section(report_id: &str, filenames: &[String]) -> String {
    let mut html = String::from("<section class=\"downloads\">\n<h2>Download PDF Reports</h2>\n<ul>\n");
    for (index, filename) in filenames.iter().enumerate() {
        html.push_str(&format!(
            "<li><a href=\"{}\" download>Feedback for {}</a></li>\n",
            escape_html(&student_pdf_path(report_id, index)),
            escape_html(filename)
        ));
    }
    html.push_str(&format!(
        "<li><a href=\"{}\" download>Class summary</a></li>\n</ul>\n</section>\n",
        escape_html(&summary_pdf_path(report_id))
    ));
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_links_follow_student_order() {
        let html = downloads_section("r1", &["b.pdf".into(), "<a>.pdf".into()]);
        let first = html.find("/api/reports/r1/students/0").unwrap();
        let second = html.find("/api/reports/r1/students/1").unwrap();
        assert!(first < second);
        assert!(html.contains("Feedback for b.pdf"));
        assert!(html.contains("Feedback for &lt;a&gt;.pdf"));
        assert!(html.contains("href=\"/api/reports/r1/summary\""));
    }
}
