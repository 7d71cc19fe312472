//! State machine behind the interactive flow. Kept out of the binary so the
//! whole walk-through (identity → answers → results → report) can be driven
//! headlessly from tests.

use crate::report::build_report;
use crate::scoring::{score, ScoreError, ScoredItem, ScoreSummary};
use crate::sheet::ExamSheet;
use crate::submission::StudentSheet;

/// Wizard steps, in submission order. Once answers are graded the flow is
/// forward-only, matching the "답안을 수정할 수 없습니다" rule of the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Step {
    #[strum(to_string = "기본 정보")]
    Identity,
    #[strum(to_string = "답안 입력")]
    Answers,
    #[strum(to_string = "결과 및 반성")]
    Results,
    #[strum(to_string = "제출")]
    Report,
}

impl Step {
    pub fn index(&self) -> usize {
        match self {
            Step::Identity => 0,
            Step::Answers => 1,
            Step::Results => 2,
            Step::Report => 3,
        }
    }
}

/// A focusable input field. Question indices are zero-based; passage
/// indices follow the sheet's passage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    StudentName,
    AcademyName,
    PreNotes,
    MidNotes,
    PassageTime(usize),
    PassageNotes(usize),
    Answer(usize),
    Confidence(usize),
    Elapsed(usize),
    Rationale(usize),
    PostNotes,
}

impl Field {
    /// Notes fields accept newlines from the enter key; everywhere else
    /// enter moves on.
    pub fn is_multiline(&self) -> bool {
        matches!(
            self,
            Field::PreNotes | Field::MidNotes | Field::PassageNotes(_) | Field::PostNotes
        )
    }
}

#[derive(Debug)]
pub struct Wizard {
    pub sheet: ExamSheet,
    pub student: StudentSheet,
    pub step: Step,
    pub focus: usize,
    pub scroll: u16,
    scored: Option<(Vec<ScoredItem>, ScoreSummary)>,
}

impl Wizard {
    pub fn new(sheet: ExamSheet, student: StudentSheet) -> Self {
        Self {
            sheet,
            student,
            step: Step::Identity,
            focus: 0,
            scroll: 0,
            scored: None,
        }
    }

    /// Focus order for the current step. With passages the answer rows are
    /// grouped under their passage (time and notes first), and questions no
    /// passage covers trail at the end; without passages every question also
    /// carries its own elapsed-time field.
    pub fn fields(&self) -> Vec<Field> {
        match self.step {
            Step::Identity => vec![Field::StudentName, Field::AcademyName, Field::PreNotes],
            Step::Answers => {
                let mut fields = vec![Field::MidNotes];
                if self.sheet.passages.is_empty() {
                    for q in 0..self.sheet.answers.len() {
                        fields.extend([
                            Field::Answer(q),
                            Field::Confidence(q),
                            Field::Elapsed(q),
                            Field::Rationale(q),
                        ]);
                    }
                } else {
                    for (pi, passage) in self.sheet.passages.iter().enumerate() {
                        fields.push(Field::PassageTime(pi));
                        fields.push(Field::PassageNotes(pi));
                        let last = passage.to.min(self.sheet.answers.len());
                        for number in passage.from..=last {
                            let q = number - 1;
                            fields.extend([
                                Field::Answer(q),
                                Field::Confidence(q),
                                Field::Rationale(q),
                            ]);
                        }
                    }
                    let assigned = self.sheet.assigned_numbers();
                    for number in 1..=self.sheet.answers.len() {
                        if !assigned.contains(&number) {
                            let q = number - 1;
                            fields.extend([
                                Field::Answer(q),
                                Field::Confidence(q),
                                Field::Rationale(q),
                            ]);
                        }
                    }
                }
                fields
            }
            Step::Results => vec![Field::PostNotes],
            Step::Report => vec![],
        }
    }

    pub fn focused(&self) -> Option<Field> {
        self.fields().get(self.focus).copied()
    }

    pub fn next_field(&mut self) {
        let n = self.fields().len();
        if n > 0 {
            self.focus = (self.focus + 1) % n;
        }
    }

    pub fn prev_field(&mut self) {
        let n = self.fields().len();
        if n > 0 {
            self.focus = (self.focus + n - 1) % n;
        }
    }

    pub fn field_text(&self, field: Field) -> &str {
        match field {
            Field::StudentName => &self.student.student_name,
            Field::AcademyName => &self.student.academy_name,
            Field::PreNotes => &self.student.pre_notes,
            Field::MidNotes => &self.student.mid_notes,
            Field::PostNotes => &self.student.post_notes,
            Field::PassageTime(pi) => self
                .student
                .passage_notes
                .get(pi)
                .map(|n| n.time.as_str())
                .unwrap_or(""),
            Field::PassageNotes(pi) => self
                .student
                .passage_notes
                .get(pi)
                .map(|n| n.notes.as_str())
                .unwrap_or(""),
            Field::Answer(q) => self
                .student
                .answers
                .get(q)
                .map(|a| a.answer.as_str())
                .unwrap_or(""),
            Field::Elapsed(q) => self
                .student
                .answers
                .get(q)
                .map(|a| a.elapsed.as_str())
                .unwrap_or(""),
            Field::Rationale(q) => self
                .student
                .answers
                .get(q)
                .map(|a| a.rationale.as_str())
                .unwrap_or(""),
            Field::Confidence(_) => "",
        }
    }

    fn field_text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::StudentName => Some(&mut self.student.student_name),
            Field::AcademyName => Some(&mut self.student.academy_name),
            Field::PreNotes => Some(&mut self.student.pre_notes),
            Field::MidNotes => Some(&mut self.student.mid_notes),
            Field::PostNotes => Some(&mut self.student.post_notes),
            Field::PassageTime(pi) => self.student.passage_notes.get_mut(pi).map(|n| &mut n.time),
            Field::PassageNotes(pi) => {
                self.student.passage_notes.get_mut(pi).map(|n| &mut n.notes)
            }
            Field::Answer(q) => self.student.answers.get_mut(q).map(|a| &mut a.answer),
            Field::Elapsed(q) => self.student.answers.get_mut(q).map(|a| &mut a.elapsed),
            Field::Rationale(q) => self.student.answers.get_mut(q).map(|a| &mut a.rationale),
            Field::Confidence(_) => None,
        }
    }

    /// Append a character to the focused field. On a confidence cell a
    /// space toggles the marker instead of typing.
    pub fn insert_char(&mut self, c: char) {
        match self.focused() {
            Some(Field::Confidence(_)) => {
                if c == ' ' {
                    self.cycle_confidence();
                }
            }
            Some(field) => {
                if let Some(text) = self.field_text_mut(field) {
                    text.push(c);
                }
            }
            None => {}
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.focused() {
            if let Some(text) = self.field_text_mut(field) {
                text.pop();
            }
        }
    }

    /// Enter: newline in notes fields, otherwise move to the next field.
    pub fn enter(&mut self) {
        match self.focused() {
            Some(field) if field.is_multiline() => self.insert_char('\n'),
            Some(_) => self.next_field(),
            None => {}
        }
    }

    pub fn cycle_confidence(&mut self) {
        if let Some(Field::Confidence(q)) = self.focused() {
            if let Some(sub) = self.student.answers.get_mut(q) {
                sub.confidence = sub.confidence.cycle();
            }
        }
    }

    /// Question index the focus sits on, for row highlighting.
    pub fn focused_question(&self) -> Option<usize> {
        match self.focused() {
            Some(
                Field::Answer(q) | Field::Confidence(q) | Field::Elapsed(q) | Field::Rationale(q),
            ) => Some(q),
            _ => None,
        }
    }

    /// Passage index the focus sits in, for the context box above the
    /// answer table. Questions covered by more than one passage resolve to
    /// the first, same as the report groups them.
    pub fn focused_passage(&self) -> Option<usize> {
        match self.focused() {
            Some(Field::PassageTime(pi) | Field::PassageNotes(pi)) => Some(pi),
            Some(
                Field::Answer(q) | Field::Confidence(q) | Field::Elapsed(q) | Field::Rationale(q),
            ) => self
                .sheet
                .passages
                .iter()
                .position(|p| p.contains(q + 1)),
            _ => None,
        }
    }

    pub fn can_advance(&self) -> bool {
        match self.step {
            Step::Identity => !self.student.student_name.trim().is_empty(),
            Step::Report => false,
            _ => true,
        }
    }

    /// Move to the next step. Leaving the answers step runs the grading
    /// pass; the result is kept for the rest of the flow.
    pub fn advance(&mut self) -> Result<(), ScoreError> {
        if !self.can_advance() {
            return Ok(());
        }
        self.step = match self.step {
            Step::Identity => Step::Answers,
            Step::Answers => {
                self.scored = Some(score(&self.sheet.answers, &self.student.answers)?);
                Step::Results
            }
            Step::Results => Step::Report,
            Step::Report => Step::Report,
        };
        self.focus = 0;
        self.scroll = 0;
        Ok(())
    }

    /// Back to the previous form step; grading locks the flow forward.
    /// Returns false when there is nowhere to go back to.
    pub fn retreat(&mut self) -> bool {
        match self.step {
            Step::Answers => {
                self.step = Step::Identity;
                self.focus = 0;
                true
            }
            _ => false,
        }
    }

    pub fn scored(&self) -> Option<&(Vec<ScoredItem>, ScoreSummary)> {
        self.scored.as_ref()
    }

    /// The submission report; available once grading has run.
    pub fn report(&self) -> Option<String> {
        self.scored
            .as_ref()
            .map(|(items, summary)| build_report(&self.sheet, &self.student, items, summary))
    }

    pub fn scroll_up(&mut self, n: u16) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: u16) {
        self.scroll = self.scroll.saturating_add(n);
    }
}
