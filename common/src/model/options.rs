use serde::{Deserialize, Serialize};

use crate::model::submission::{ExamBoard, Level, Subject};

/// Weekly upload cap advertised in the form's help text unless configured otherwise.
pub const DEFAULT_WEEKLY_UPLOAD_LIMIT: u32 = 15;

/// What the upload form may offer. Served by `GET /api/upload/options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormOptions {
    pub levels: Vec<Level>,
    pub subjects: Vec<Subject>,
    pub exam_boards: Vec<ExamBoard>,
    /// Whether the optional "marking points" file input is rendered.
    pub show_marking_points: bool,
    pub weekly_upload_limit: u32,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            levels: Level::ALL.to_vec(),
            subjects: Subject::ALL.to_vec(),
            exam_boards: ExamBoard::ALL.to_vec(),
            show_marking_points: true,
            weekly_upload_limit: DEFAULT_WEEKLY_UPLOAD_LIMIT,
        }
    }
}

impl FormOptions {
    pub fn help_text(&self) -> String {
        format!(
            "Each account can upload up to {} batches per week.",
            self.weekly_upload_limit
        )
    }
}
