use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use common::model::results::ResultSet;
use common::model::submission::{
    DeliveryOption, Document, ExamBoard, Level, Subject, SubmissionRequest,
};
use log::debug;
use serde::Serialize;

use super::{Marker, MarkingError};

/// Talks to the marking engine over HTTP: `POST {base_url}/mark` with a JSON
/// `MarkingJob`, answered by a `ResultSet` JSON body.
pub struct HttpMarker {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMarker {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/mark", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EncodedDocument<'a> {
    filename: &'a str,
    content_base64: String,
}

impl<'a> From<&'a Document> for EncodedDocument<'a> {
    fn from(doc: &'a Document) -> Self {
        Self {
            filename: &doc.filename,
            content_base64: BASE64.encode(&doc.content),
        }
    }
}

/// Wire form of a submission. Documents travel base64 encoded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkingJob<'a> {
    level: Level,
    subject: Subject,
    exam_board: ExamBoard,
    feedback_detail: &'a str,
    additional_info: Option<&'a str>,
    teacher_email: Option<&'a str>,
    delivery_options: Vec<DeliveryOption>,
    markscheme: EncodedDocument<'a>,
    students: Vec<EncodedDocument<'a>>,
    marking_points: Option<EncodedDocument<'a>>,
}

impl<'a> From<&'a SubmissionRequest> for MarkingJob<'a> {
    fn from(req: &'a SubmissionRequest) -> Self {
        Self {
            level: req.level,
            subject: req.subject,
            exam_board: req.exam_board,
            feedback_detail: &req.feedback_detail,
            additional_info: req.additional_info.as_deref(),
            teacher_email: req.teacher_email.as_deref(),
            delivery_options: req.delivery_options.iter().copied().collect(),
            markscheme: (&req.markscheme_file).into(),
            students: req.student_files.iter().map(EncodedDocument::from).collect(),
            marking_points: req.marking_points_file.as_ref().map(EncodedDocument::from),
        }
    }
}

#[async_trait]
impl Marker for HttpMarker {
    async fn mark(&self, request: &SubmissionRequest) -> Result<ResultSet, MarkingError> {
        let job = MarkingJob::from(request);
        debug!(
            "Sending {} student file(s) to {}",
            job.students.len(),
            self.endpoint()
        );

        let response = self.client.post(self.endpoint()).json(&job).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(MarkingError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(ResultSet::from_json(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::submission::FEEDBACK_DETAIL;
    use std::collections::BTreeSet;

    #[test]
    fn job_encodes_documents_and_labels() {
        let request = SubmissionRequest {
            level: Level::ALevel,
            subject: Subject::ComputerScience,
            exam_board: ExamBoard::Ocr,
            markscheme_file: Document::new("ms.pdf", b"hello".to_vec()),
            student_files: vec![Document::new("bob.pdf", vec![0xff, 0x00])],
            marking_points_file: None,
            teacher_email: Some("t@school.uk".into()),
            additional_info: None,
            feedback_detail: FEEDBACK_DETAIL.into(),
            delivery_options: BTreeSet::from([DeliveryOption::Email]),
        };

        let json = serde_json::to_value(MarkingJob::from(&request)).unwrap();
        assert_eq!(json["level"], "A level");
        assert_eq!(json["subject"], "Computer Science");
        assert_eq!(json["examBoard"], "OCR");
        assert_eq!(json["feedbackDetail"], "parts");
        assert_eq!(json["deliveryOptions"], serde_json::json!(["email"]));
        assert_eq!(json["markscheme"]["contentBase64"], "aGVsbG8=");
        assert_eq!(json["students"][0]["contentBase64"], "/wA=");
        assert!(json["markingPoints"].is_null());
    }

    #[test]
    fn endpoint_joins_cleanly() {
        assert_eq!(HttpMarker::new("http://m:9000/").endpoint(), "http://m:9000/mark");
    }
}
