use serde::{Deserialize, Serialize};

use crate::scoring::Submission;
use crate::sheet::ExamSheet;

/// Per-passage solving record: time spent on the passage plus a free-form
/// strategy/reflection note.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PassageNote {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub notes: String,
}

/// Everything a student enters for one sheet. This is also the input format
/// of non-interactive grading (`haesulji grade --answers student.json`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentSheet {
    pub student_name: String,
    #[serde(default)]
    pub academy_name: String,
    #[serde(default)]
    pub pre_notes: String,
    #[serde(default)]
    pub mid_notes: String,
    #[serde(default)]
    pub post_notes: String,
    #[serde(default)]
    pub answers: Vec<Submission>,
    #[serde(default)]
    pub passage_notes: Vec<PassageNote>,
}

impl StudentSheet {
    /// Empty entries in lockstep with the sheet: one submission per key
    /// entry, one note per passage. Keeping the arrays parallel from the
    /// start is what lets grading assume equal lengths.
    pub fn blank(sheet: &ExamSheet) -> Self {
        Self {
            answers: vec![Submission::default(); sheet.answers.len()],
            passage_notes: vec![PassageNote::default(); sheet.passages.len()],
            ..Self::default()
        }
    }
}
