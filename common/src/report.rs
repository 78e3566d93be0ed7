//! Turns a `ResultSet` into the HTML body of the results page.
//!
//! Layout, in order:
//! - header with level, subject and exam board;
//! - "Mark Scheme Used" block, only when the mark scheme text is present and
//!   not the empty string (whitespace alone still shows the block);
//! - one block per student, in input order: filename, the rendered original
//!   answer and, side by side, the feedback for each part in input order;
//! - class average and class feedback.
//!
//! Plain strings go through `escape_html`; free text goes through
//! `markdown::render`. Nothing is reordered or deduplicated.

use std::fmt::Write;

use crate::markdown::{escape_html, render as render_markdown};
use crate::model::results::{PartFeedback, RenderingInputError, ResultSet, StudentResult};

/// Validates `results` and renders the report body.
pub fn render_report(results: &ResultSet) -> Result<String, RenderingInputError> {
    results.validate()?;

    let mut out = String::new();
    push_header(&mut out, results);

    if let Some(text) = results.markscheme_text.as_deref().filter(|t| !t.is_empty()) {
        let _ = write!(
            out,
            "<section class=\"markscheme\">\n<h2>Mark Scheme Used</h2>\n<div class=\"markdown\">{}</div>\n</section>\n",
            render_markdown(text)
        );
    }

    for student in &results.results {
        push_student(&mut out, student);
    }

    let _ = write!(
        out,
        "<section class=\"class-summary\">\n<h2>Class Summary</h2>\n<p class=\"class-average\">Class Average: {}%</p>\n<div class=\"markdown\">{}</div>\n</section>\n",
        format_score(results.class_average),
        render_markdown(&results.class_feedback)
    );

    Ok(out)
}

fn push_header(out: &mut String, results: &ResultSet) {
    let _ = write!(
        out,
        "<header class=\"report-header\">\n<h1>Marking Results</h1>\n<p class=\"context\">{} &middot; {} &middot; {}</p>\n</header>\n",
        escape_html(&results.level),
        escape_html(&results.subject),
        escape_html(&results.exam_board)
    );
}

fn push_student(out: &mut String, student: &StudentResult) {
    let _ = write!(
        out,
        "<section class=\"student\">\n<h2>{}</h2>\n<div class=\"side-by-side\">\n<div class=\"original\">\n<h3>Original Answer</h3>\n<div class=\"markdown\">{}</div>\n</div>\n<div class=\"feedback\">\n<h3>AI Feedback</h3>\n",
        escape_html(&student.filename),
        render_markdown(&student.student_text)
    );
    for part in &student.parts {
        let _ = write!(
            out,
            "<div class=\"part\">\n<h4>{}</h4>\n<div class=\"markdown\">{}</div>\n</div>\n",
            escape_html(&part_heading(part)),
            render_markdown(&part.feedback)
        );
    }
    out.push_str("</div>\n</div>\n</section>\n");
}

/// "Q1 — 3/5" when both scores are present, otherwise just the question label.
pub fn part_heading(part: &PartFeedback) -> String {
    match part.score() {
        Some((awarded, total)) => format!(
            "{} \u{2014} {}/{}",
            part.question,
            format_score(awarded),
            format_score(total)
        ),
        None => part.question.clone(),
    }
}

/// Prints a number as given: whole values without a fractional part.
pub fn format_score(value: f64) -> String {
    format!("{}", value)
}
