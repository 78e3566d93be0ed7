//! The upload a teacher submits for marking.
//!
//! The closed sets (`Level`, `Subject`, `ExamBoard`) are shared by the form,
//! which renders them as `<select>` options, and by the backend, which rejects
//! any value outside them. Each one serializes as its human label because that
//! is what the browser posts back in the multipart body.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::form::{ValidationError, validate_delivery};

/// Fixed value of the `feedback_detail` field; the form does not let users change it.
pub const FEEDBACK_DETAIL: &str = "parts";

/// Returned when a posted label is not part of a closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind} '{value}' selected.")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! closed_set {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every allowed value, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label() == trimmed)
                    .ok_or_else(|| UnknownValue {
                        kind: $kind,
                        value: trimmed.to_string(),
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

closed_set!(
    /// Qualification level of the paper being marked.
    Level, "level", {
        Ks3 => "KS3",
        Gcse => "GCSE",
        ALevel => "A level",
    }
);

closed_set!(
    Subject, "subject", {
        Physics => "Physics",
        Maths => "Maths",
        English => "English",
        History => "History",
        Geography => "Geography",
        Biology => "Biology",
        Chemistry => "Chemistry",
        ComputerScience => "Computer Science",
        DesignAndTechnology => "Design and Technology",
        ArtAndDesign => "Art and Design",
    }
);

closed_set!(
    ExamBoard, "exam board", {
        Aqa => "AQA",
        Edexcel => "Edexcel",
        Ocr => "OCR",
        Wjec => "WJEC",
    }
);

closed_set!(
    /// Channel through which results reach the teacher.
    DeliveryOption, "delivery option", {
        Website => "website",
        Email => "email",
    }
);

/// One uploaded document, held in memory until it is handed to the marking service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub content: Vec<u8>,
}

impl Document {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }
}

/// Why a `SubmissionRequest` was refused server side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Mark scheme and at least one student file are required.")]
    MissingFiles,
    #[error(transparent)]
    Delivery(#[from] ValidationError),
}

/// A single upload, built once from the form and then discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub level: Level,
    pub subject: Subject,
    pub exam_board: ExamBoard,
    pub markscheme_file: Document,
    pub student_files: Vec<Document>,
    pub marking_points_file: Option<Document>,
    pub teacher_email: Option<String>,
    pub additional_info: Option<String>,
    pub feedback_detail: String,
    pub delivery_options: BTreeSet<DeliveryOption>,
}

impl SubmissionRequest {
    /// Re-checks the invariants the form already enforces in the browser.
    pub fn validate(&self) -> Result<(), SubmissionError> {
        if self.student_files.is_empty() {
            return Err(SubmissionError::MissingFiles);
        }
        validate_delivery(
            &self.delivery_options,
            self.teacher_email.as_deref().unwrap_or(""),
        )?;
        Ok(())
    }

    pub fn wants(&self, option: DeliveryOption) -> bool {
        self.delivery_options.contains(&option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(delivery: &[DeliveryOption], email: Option<&str>) -> SubmissionRequest {
        SubmissionRequest {
            level: Level::Gcse,
            subject: Subject::Physics,
            exam_board: ExamBoard::Aqa,
            markscheme_file: Document::new("ms.pdf", b"ms".to_vec()),
            student_files: vec![Document::new("alice.pdf", b"a".to_vec())],
            marking_points_file: None,
            teacher_email: email.map(str::to_string),
            additional_info: None,
            feedback_detail: FEEDBACK_DETAIL.to_string(),
            delivery_options: delivery.iter().copied().collect(),
        }
    }

    #[test]
    fn labels_parse_back_to_variants() {
        assert_eq!("A level".parse::<Level>(), Ok(Level::ALevel));
        assert_eq!(" Computer Science ".parse::<Subject>(), Ok(Subject::ComputerScience));
        assert_eq!("WJEC".parse::<ExamBoard>(), Ok(ExamBoard::Wjec));
        assert_eq!("email".parse::<DeliveryOption>(), Ok(DeliveryOption::Email));
    }

    #[test]
    fn unknown_label_names_the_field() {
        let err = "Latin".parse::<Subject>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid subject 'Latin' selected.");
        assert!("gcse".parse::<Level>().is_err());
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Level::ALevel).unwrap();
        assert_eq!(json, "\"A level\"");
        let back: ExamBoard = serde_json::from_str("\"OCR\"").unwrap();
        assert_eq!(back, ExamBoard::Ocr);
    }

    #[test]
    fn server_side_validation_mirrors_the_form() {
        assert!(request(&[DeliveryOption::Website], None).validate().is_ok());
        assert_eq!(
            request(&[], None).validate(),
            Err(SubmissionError::Delivery(ValidationError::NoDeliveryOption))
        );
        assert_eq!(
            request(&[DeliveryOption::Email], Some("  ")).validate(),
            Err(SubmissionError::Delivery(ValidationError::MissingEmail))
        );
        assert!(
            request(&[DeliveryOption::Email], Some("t@school.uk"))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn student_files_are_required() {
        let mut req = request(&[DeliveryOption::Website], None);
        req.student_files.clear();
        assert_eq!(req.validate(), Err(SubmissionError::MissingFiles));
    }
}
