//! Output of the external marking service, consumed read-only by the report renderer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The results of one marked batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    pub level: String,
    pub subject: String,
    pub exam_board: String,
    #[serde(default)]
    pub markscheme_text: Option<String>,
    pub results: Vec<StudentResult>,
    pub class_average: f64,
    pub class_feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResult {
    pub filename: String,
    pub student_text: String,
    pub parts: Vec<PartFeedback>,
}

/// Feedback for one gradable sub-question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartFeedback {
    pub question: String,
    #[serde(default)]
    pub awarded: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    pub feedback: String,
}

impl PartFeedback {
    /// The `awarded/total` pair, only when both halves are present.
    pub fn score(&self) -> Option<(f64, f64)> {
        self.awarded.zip(self.total)
    }
}

/// A result set that cannot be rendered faithfully.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderingInputError {
    #[error("malformed result set: {0}")]
    Malformed(String),
    #[error("student '{filename}', question '{question}': awarded and total must be given together")]
    UnpairedScore { filename: String, question: String },
    #[error("student '{filename}', question '{question}': score is not a finite number")]
    NonFiniteScore { filename: String, question: String },
    #[error("class average is not a finite number")]
    NonFiniteAverage,
}

impl ResultSet {
    /// Parses the marking service's JSON body and checks it can be rendered.
    pub fn from_json(body: &str) -> Result<Self, RenderingInputError> {
        let set: ResultSet = serde_json::from_str(body)
            .map_err(|e| RenderingInputError::Malformed(e.to_string()))?;
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), RenderingInputError> {
        if !self.class_average.is_finite() {
            return Err(RenderingInputError::NonFiniteAverage);
        }
        for student in &self.results {
            for part in &student.parts {
                let located = || (student.filename.clone(), part.question.clone());
                match (part.awarded, part.total) {
                    (Some(_), None) | (None, Some(_)) => {
                        let (filename, question) = located();
                        return Err(RenderingInputError::UnpairedScore { filename, question });
                    }
                    (Some(a), Some(t)) if !a.is_finite() || !t.is_finite() => {
                        let (filename, question) = located();
                        return Err(RenderingInputError::NonFiniteScore { filename, question });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "level": "GCSE",
        "subject": "Physics",
        "examBoard": "AQA",
        "results": [
            {
                "filename": "alice.pdf",
                "studentText": "F = ma",
                "parts": [
                    {"question": "Q1", "awarded": 3, "total": 5, "feedback": "Good"},
                    {"question": "Q2", "feedback": "N/A"}
                ]
            }
        ],
        "classAverage": 60.0,
        "classFeedback": "Solid work"
    }"#;

    #[test]
    fn parses_camel_case_body_with_optional_fields() {
        let set = ResultSet::from_json(BODY).unwrap();
        assert_eq!(set.markscheme_text, None);
        assert_eq!(set.results[0].parts[0].score(), Some((3.0, 5.0)));
        assert_eq!(set.results[0].parts[1].score(), None);
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let body = BODY.replace("\"classFeedback\": \"Solid work\"", "\"extra\": 1");
        match ResultSet::from_json(&body) {
            Err(RenderingInputError::Malformed(msg)) => assert!(msg.contains("classFeedback")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn half_a_score_is_rejected() {
        let body = BODY.replace(r#"{"question": "Q2", "feedback""#, r#"{"question": "Q2", "total": 4, "feedback""#);
        assert_eq!(
            ResultSet::from_json(&body),
            Err(RenderingInputError::UnpairedScore {
                filename: "alice.pdf".into(),
                question: "Q2".into(),
            })
        );
    }

    #[test]
    fn non_finite_average_is_rejected() {
        let mut set = ResultSet::from_json(BODY).unwrap();
        set.class_average = f64::NAN;
        assert_eq!(set.validate(), Err(RenderingInputError::NonFiniteAverage));
    }
}
