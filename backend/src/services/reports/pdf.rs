//! PDF exports of a marked batch: one feedback document per student and one
//! class summary, laid out with `genpdf` from the same `ResultSet` the report
//! page is rendered from.

use crate::config::PdfFonts;
use common::markdown::{text_lines, TextRun};
use common::model::results::ResultSet;
use common::report::{format_score, part_heading};
use genpdf::elements::{Break, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Style, StyledString};
use genpdf::Document;
use std::fs;
use thiserror::Error;

const FONT_SIZE_PT: u8 = 11;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("fonts for '{family}' not found in {dir}")]
    Fonts { dir: String, family: String },
    #[error("no student at position {0}")]
    NoSuchStudent(usize),
    #[error(transparent)]
    Render(#[from] genpdf::error::Error),
}

/// "Feedback for: {filename}", the batch context, then every part's heading and feedback.
pub fn student_feedback_pdf(
    fonts: &PdfFonts,
    results: &ResultSet,
    index: usize,
) -> Result<Vec<u8>, PdfError> {
    let student = results
        .results
        .get(index)
        .ok_or(PdfError::NoSuchStudent(index))?;

    let mut doc = configure_document(fonts, &format!("Feedback for {}", student.filename))?;
    push_title(&mut doc, &format!("Feedback for: {}", student.filename), 14);
    push_context(&mut doc, results);

    for part in &student.parts {
        doc.push(Break::new(1));
        let mut heading = Paragraph::new("");
        heading.push(StyledString::new(part_heading(part), Style::new().bold()));
        doc.push(heading);
        push_markdown(&mut doc, &part.feedback);
    }

    render(doc)
}

/// "Class Summary", "Class Average: {avg}%" and the class feedback.
pub fn class_summary_pdf(fonts: &PdfFonts, results: &ResultSet) -> Result<Vec<u8>, PdfError> {
    let mut doc = configure_document(fonts, "Class Summary")?;
    push_title(&mut doc, "Class Summary", 16);
    push_context(&mut doc, results);
    doc.push(Break::new(1));
    doc.push(Paragraph::new(format!(
        "Class Average: {}%",
        format_score(results.class_average)
    )));
    doc.push(Break::new(1));
    push_markdown(&mut doc, &results.class_feedback);

    render(doc)
}

/// Accepts both `Name-Regular/-Bold/-Italic/-BoldItalic.ttf` and the
/// `Name/-Bold/-Oblique/-BoldOblique.ttf` naming used by DejaVu.
fn load_font(fonts: &PdfFonts) -> Result<FontFamily<FontData>, PdfError> {
    if let Ok(family) = genpdf::fonts::from_files(&fonts.dir, &fonts.family, None) {
        return Ok(family);
    }

    let missing = || PdfError::Fonts {
        dir: fonts.dir.display().to_string(),
        family: fonts.family.clone(),
    };
    let load = |suffix: &str| -> Result<FontData, PdfError> {
        let path = fonts.dir.join(format!("{}{}.ttf", fonts.family, suffix));
        let bytes = fs::read(path).map_err(|_| missing())?;
        Ok(FontData::new(bytes, None)?)
    };

    Ok(FontFamily {
        regular: load("")?,
        bold: load("-Bold")?,
        italic: load("-Oblique")?,
        bold_italic: load("-BoldOblique")?,
    })
}

fn configure_document(fonts: &PdfFonts, title: &str) -> Result<Document, PdfError> {
    let mut doc = Document::new(load_font(fonts)?);
    doc.set_title(title);
    doc.set_font_size(FONT_SIZE_PT);
    doc.set_line_spacing(1.0f64);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

fn push_title(doc: &mut Document, title: &str, size: u8) {
    let mut p = Paragraph::new("");
    p.push(StyledString::new(
        title.to_string(),
        Style::new().bold().with_font_size(size),
    ));
    doc.push(p);
}

fn push_context(doc: &mut Document, results: &ResultSet) {
    doc.push(Paragraph::new(format!(
        "{} \u{00b7} {} \u{00b7} {}",
        results.level, results.subject, results.exam_board
    )));
}

fn push_markdown(doc: &mut Document, text: &str) {
    for line in text_lines(text) {
        let mut p = Paragraph::new("");
        for run in line {
            p.push(styled(run));
        }
        doc.push(p);
    }
}

fn styled(run: TextRun) -> StyledString {
    let style = match (run.strong, run.emphasis) {
        (true, true) => Style::new().bold().italic(),
        (true, false) => Style::new().bold(),
        (false, true) => Style::new().italic(),
        (false, false) => Style::new(),
    };
    StyledString::new(run.text, style)
}

fn render(doc: Document) -> Result<Vec<u8>, PdfError> {
    let mut out = Vec::new();
    doc.render(&mut out)?;
    Ok(out)
}
