use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A named, inclusive span of question numbers (1-indexed), e.g. one
/// reading passage of a language exam.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub name: String,
    pub from: usize,
    pub to: usize,
}

impl Passage {
    pub fn contains(&self, number: usize) -> bool {
        number >= self.from && number <= self.to
    }

    pub fn question_count(&self) -> usize {
        self.to.saturating_sub(self.from) + 1
    }
}

/// Everything an instructor defines for one exam. This is the payload that
/// round-trips through the share code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExamSheet {
    pub exam_name: String,
    #[serde(default)]
    pub paper_link: String,
    #[serde(default)]
    pub answer_link: String,
    pub answers: Vec<String>,
    #[serde(default)]
    pub passages: Vec<Passage>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SheetError {
    #[error("exam name is empty")]
    EmptyExamName,
    #[error("answer key is empty")]
    EmptyAnswerKey,
    #[error("answer {number} is blank")]
    BlankAnswer { number: usize },
    #[error("passage name is empty")]
    EmptyPassageName,
    #[error("passage \"{name}\" has an invalid span {from}~{to}")]
    BadPassageSpan {
        name: String,
        from: usize,
        to: usize,
    },
}

impl ExamSheet {
    /// Structural checks shared by every entry point (CLI flags, sheet
    /// files, decoded share codes). Passage spans past the end of the key
    /// are tolerated; they simply match no questions.
    pub fn validate(&self) -> Result<(), SheetError> {
        if self.exam_name.trim().is_empty() {
            return Err(SheetError::EmptyExamName);
        }
        if self.answers.is_empty() {
            return Err(SheetError::EmptyAnswerKey);
        }
        for (i, answer) in self.answers.iter().enumerate() {
            if answer.trim().is_empty() {
                return Err(SheetError::BlankAnswer { number: i + 1 });
            }
        }
        for passage in &self.passages {
            if passage.name.trim().is_empty() {
                return Err(SheetError::EmptyPassageName);
            }
            if passage.from < 1 || passage.from > passage.to {
                return Err(SheetError::BadPassageSpan {
                    name: passage.name.clone(),
                    from: passage.from,
                    to: passage.to,
                });
            }
        }
        Ok(())
    }

    pub fn question_count(&self) -> usize {
        self.answers.len()
    }

    /// Set union of all passage spans; question numbers outside it land in
    /// the "other questions" section of forms and reports.
    pub fn assigned_numbers(&self) -> HashSet<usize> {
        self.passages
            .iter()
            .flat_map(|p| p.from..=p.to)
            .collect()
    }
}

/// Comma-separated answer entry as instructors type it: split on commas,
/// trim, drop empties.
pub fn parse_answer_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sheet() -> ExamSheet {
        ExamSheet {
            exam_name: "2025년 3월 고3 국어 모의고사".to_string(),
            paper_link: String::new(),
            answer_link: String::new(),
            answers: vec!["4".into(), "3".into(), "1".into(), "3".into(), "5".into()],
            passages: vec![
                Passage {
                    name: "독서론".into(),
                    from: 1,
                    to: 3,
                },
                Passage {
                    name: "고전소설".into(),
                    from: 4,
                    to: 5,
                },
            ],
        }
    }

    #[test]
    fn valid_sheet_passes() {
        assert_eq!(sheet().validate(), Ok(()));
    }

    #[test]
    fn rejects_blank_exam_name() {
        let mut s = sheet();
        s.exam_name = "   ".into();
        assert_matches!(s.validate(), Err(SheetError::EmptyExamName));
    }

    #[test]
    fn rejects_empty_answer_key() {
        let mut s = sheet();
        s.answers.clear();
        assert_matches!(s.validate(), Err(SheetError::EmptyAnswerKey));
    }

    #[test]
    fn rejects_blank_answer_with_its_number() {
        let mut s = sheet();
        s.answers[2] = " ".into();
        assert_matches!(s.validate(), Err(SheetError::BlankAnswer { number: 3 }));
    }

    #[test]
    fn rejects_inverted_passage_span() {
        let mut s = sheet();
        s.passages[0].from = 4;
        s.passages[0].to = 2;
        assert_matches!(s.validate(), Err(SheetError::BadPassageSpan { .. }));
    }

    #[test]
    fn rejects_zero_based_passage_span() {
        let mut s = sheet();
        s.passages[0].from = 0;
        assert_matches!(s.validate(), Err(SheetError::BadPassageSpan { .. }));
    }

    #[test]
    fn tolerates_span_past_the_key() {
        let mut s = sheet();
        s.passages[1].to = 40;
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn assigned_numbers_is_the_union_of_spans() {
        let s = sheet();
        let assigned = s.assigned_numbers();
        assert_eq!(assigned, (1..=5).collect());

        let mut gapped = s;
        gapped.passages[1].from = 5;
        let assigned = gapped.assigned_numbers();
        assert!(assigned.contains(&1));
        assert!(!assigned.contains(&4));
        assert!(assigned.contains(&5));
    }

    #[test]
    fn passage_contains_is_inclusive() {
        let p = Passage {
            name: "기술".into(),
            from: 7,
            to: 9,
        };
        assert!(!p.contains(6));
        assert!(p.contains(7));
        assert!(p.contains(9));
        assert!(!p.contains(10));
        assert_eq!(p.question_count(), 3);
    }

    #[test]
    fn parse_answer_list_trims_and_drops_empties() {
        assert_eq!(
            parse_answer_list("4, 3 ,1,, 3 , 5,"),
            vec!["4", "3", "1", "3", "5"]
        );
        assert!(parse_answer_list("  ,  , ").is_empty());
    }

    #[test]
    fn sheet_json_defaults_optional_fields() {
        let json = r#"{"exam_name":"모의고사","answers":["1","2"]}"#;
        let s: ExamSheet = serde_json::from_str(json).unwrap();
        assert_eq!(s.paper_link, "");
        assert_eq!(s.answer_link, "");
        assert!(s.passages.is_empty());
        assert_eq!(s.validate(), Ok(()));
    }
}
