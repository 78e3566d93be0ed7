//! Reads the `multipart/form-data` body posted by the upload form.
//!
//! Fields are consumed in whatever order the browser sends them. Text fields
//! are decoded as UTF-8, file fields are buffered in memory, and an empty file
//! part (an `<input type="file">` left blank) is ignored. Nothing is written to
//! disk. Once the body is exhausted the collected values are parsed into a
//! `SubmissionRequest` and its invariants are re-checked.

use actix_multipart::Multipart;
use common::form::fields;
use common::model::submission::{
    DeliveryOption, Document, ExamBoard, Level, Subject, SubmissionError, SubmissionRequest,
    UnknownValue, FEEDBACK_DETAIL,
};
use futures_util::StreamExt;
use std::collections::BTreeSet;

use super::UploadError;

/// Streams the multipart body, refusing it once more than `max_bytes` have been received.
pub async fn read_submission(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<SubmissionRequest, UploadError> {
    let mut form = RawForm::default();
    let mut received = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .filter(|f| !f.is_empty());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            received += chunk.len();
            if received > max_bytes {
                return Err(UploadError::TooLarge {
                    limit_bytes: max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        if let Some(name) = name {
            form.accept(&name, filename, bytes)?;
        }
    }

    form.into_request()
}

/// Values as posted, before any parsing.
#[derive(Debug, Default)]
struct RawForm {
    level: Option<String>,
    subject: Option<String>,
    exam_board: Option<String>,
    markscheme_file: Option<Document>,
    student_files: Vec<Document>,
    marking_points_file: Option<Document>,
    teacher_email: Option<String>,
    additional_info: Option<String>,
    feedback_detail: Option<String>,
    delivery_options: Vec<String>,
}

impl RawForm {
    fn accept(
        &mut self,
        name: &str,
        filename: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<(), UploadError> {
        match name {
            fields::MARKSCHEME_FILE | fields::MARKING_POINTS_FILE | fields::STUDENT_FILES => {
                let Some(filename) = filename else {
                    return Ok(());
                };
                let document = Document::new(secure_filename(&filename), bytes);
                match name {
                    fields::MARKSCHEME_FILE => self.markscheme_file = Some(document),
                    fields::MARKING_POINTS_FILE => self.marking_points_file = Some(document),
                    _ => self.student_files.push(document),
                }
            }
            fields::LEVEL => self.level = Some(text(fields::LEVEL, bytes)?),
            fields::SUBJECT => self.subject = Some(text(fields::SUBJECT, bytes)?),
            fields::EXAM_BOARD => self.exam_board = Some(text(fields::EXAM_BOARD, bytes)?),
            fields::TEACHER_EMAIL => self.teacher_email = Some(text(fields::TEACHER_EMAIL, bytes)?),
            fields::ADDITIONAL_INFO => {
                self.additional_info = Some(text(fields::ADDITIONAL_INFO, bytes)?)
            }
            fields::FEEDBACK_DETAIL => {
                self.feedback_detail = Some(text(fields::FEEDBACK_DETAIL, bytes)?)
            }
            fields::DELIVERY_OPTION => self
                .delivery_options
                .push(text(fields::DELIVERY_OPTION, bytes)?),
            _ => {}
        }
        Ok(())
    }

    fn into_request(self) -> Result<SubmissionRequest, UploadError> {
        let level: Level = self.level.as_deref().unwrap_or("").parse()?;
        let subject: Subject = self.subject.as_deref().unwrap_or("").parse()?;
        let exam_board: ExamBoard = self.exam_board.as_deref().unwrap_or("").parse()?;

        let feedback_detail = self
            .feedback_detail
            .map(|d| d.trim().to_string())
            .unwrap_or_else(|| FEEDBACK_DETAIL.to_string());
        if feedback_detail != FEEDBACK_DETAIL {
            return Err(UnknownValue {
                kind: "feedback detail",
                value: feedback_detail,
            }
            .into());
        }

        let delivery_options = self
            .delivery_options
            .iter()
            .map(|raw| raw.parse::<DeliveryOption>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        let markscheme_file = self.markscheme_file.ok_or(SubmissionError::MissingFiles)?;

        let request = SubmissionRequest {
            level,
            subject,
            exam_board,
            markscheme_file,
            student_files: self.student_files,
            marking_points_file: self.marking_points_file,
            teacher_email: non_empty(self.teacher_email),
            additional_info: non_empty(self.additional_info),
            feedback_detail,
            delivery_options,
        };
        request.validate()?;
        Ok(request)
    }
}

fn text(field: &'static str, bytes: Vec<u8>) -> Result<String, UploadError> {
    String::from_utf8(bytes).map_err(|_| UploadError::NotUtf8(field))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reduces a client-supplied filename to a safe basename.
///
/// Directory components are dropped, spaces become underscores, anything
/// outside `[A-Za-z0-9._-]` is removed and leading dots are trimmed.
pub fn secure_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => Some(c),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches(['.', '_']);
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::form::ValidationError;

    fn filled() -> RawForm {
        let mut form = RawForm::default();
        form.accept(fields::LEVEL, None, b"GCSE".to_vec()).unwrap();
        form.accept(fields::SUBJECT, None, b"Physics".to_vec()).unwrap();
        form.accept(fields::EXAM_BOARD, None, b"AQA".to_vec()).unwrap();
        form.accept(fields::MARKSCHEME_FILE, Some("ms.pdf".into()), b"ms".to_vec()).unwrap();
        form.accept(fields::STUDENT_FILES, Some("a.pdf".into()), b"a".to_vec()).unwrap();
        form.accept(fields::STUDENT_FILES, Some("b.pdf".into()), b"b".to_vec()).unwrap();
        form.accept(fields::FEEDBACK_DETAIL, None, b"parts".to_vec()).unwrap();
        form.accept(fields::DELIVERY_OPTION, None, b"website".to_vec()).unwrap();
        form
    }

    #[test]
    fn builds_request_keeping_student_order() {
        let request = filled().into_request().unwrap();
        assert_eq!(request.level, Level::Gcse);
        assert_eq!(request.subject, Subject::Physics);
        assert_eq!(request.exam_board, ExamBoard::Aqa);
        let names: Vec<_> = request.student_files.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, ["a.pdf", "b.pdf"]);
        assert_eq!(request.teacher_email, None);
    }

    #[test]
    fn blank_file_inputs_are_ignored() {
        let mut form = filled();
        form.accept(fields::MARKING_POINTS_FILE, None, Vec::new()).unwrap();
        form.accept(fields::STUDENT_FILES, None, Vec::new()).unwrap();
        let request = form.into_request().unwrap();
        assert!(request.marking_points_file.is_none());
        assert_eq!(request.student_files.len(), 2);
    }

    #[test]
    fn unknown_subject_is_rejected() {
        let mut form = filled();
        form.accept(fields::SUBJECT, None, b"Latin".to_vec()).unwrap();
        let err = form.into_request().unwrap_err();
        assert_eq!(err.to_string(), "Invalid subject 'Latin' selected.");
    }

    #[test]
    fn email_delivery_needs_an_address() {
        let mut form = filled();
        form.delivery_options = vec!["email".into()];
        form.accept(fields::TEACHER_EMAIL, None, b"   ".to_vec()).unwrap();
        match form.into_request() {
            Err(UploadError::Invalid(SubmissionError::Delivery(ValidationError::MissingEmail))) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn no_delivery_option_is_rejected() {
        let mut form = filled();
        form.delivery_options.clear();
        assert!(matches!(
            form.into_request(),
            Err(UploadError::Invalid(SubmissionError::Delivery(
                ValidationError::NoDeliveryOption
            )))
        ));
    }

    #[test]
    fn missing_mark_scheme_is_rejected() {
        let mut form = filled();
        form.markscheme_file = None;
        assert!(matches!(
            form.into_request(),
            Err(UploadError::Invalid(SubmissionError::MissingFiles))
        ));
    }

    #[test]
    fn feedback_detail_is_fixed() {
        let mut form = filled();
        form.feedback_detail = Some("summary".into());
        assert!(matches!(form.into_request(), Err(UploadError::UnknownValue(_))));
    }

    #[test]
    fn filenames_are_made_safe() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename(r"C:\Users\t\Year 10 <mock>.pdf"), "Year_10_mock.pdf");
        assert_eq!(secure_filename(".hidden"), "hidden");
        assert_eq!(secure_filename("???"), "upload");
    }
}
