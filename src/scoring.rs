use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Self-assessed difficulty marker a student attaches to an answer.
/// Reported but never scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Easy,
    Unsure,
    Guessed,
    #[default]
    None,
}

impl Confidence {
    /// Symbol used in the report. Fixed 4-way table, one symbol per variant.
    pub fn symbol(&self) -> &'static str {
        match self {
            Confidence::Easy => "◯",
            Confidence::Unsure => "△",
            Confidence::Guessed => "✕",
            Confidence::None => "-",
        }
    }

    /// Next marker in toggle order, wrapping back to unset.
    pub fn cycle(&self) -> Self {
        match self {
            Confidence::None => Confidence::Easy,
            Confidence::Easy => Confidence::Unsure,
            Confidence::Unsure => Confidence::Guessed,
            Confidence::Guessed => Confidence::None,
        }
    }
}

/// What a student enters for a single question. Empty strings mean absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub elapsed: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub confidence: Confidence,
}

/// One graded question; `number` is 1-indexed.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredItem {
    pub number: usize,
    pub given: String,
    pub correct: String,
    pub is_correct: bool,
    pub elapsed: String,
    pub rationale: String,
    pub confidence: Confidence,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreSummary {
    pub correct_count: usize,
    pub total_count: usize,
    pub percentage: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("answer key has {expected} items but {actual} submissions were given")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Grade submissions against the answer key.
///
/// Correctness is string equality after trimming both sides; no case folding
/// and no numeric normalization, so `"4"` matches `"4 "` but not `"04"`.
/// The two slices must be the same length; a mismatch would misattribute
/// scores to the wrong question, so it is an error rather than a truncation.
pub fn score(
    answer_key: &[String],
    submissions: &[Submission],
) -> Result<(Vec<ScoredItem>, ScoreSummary), ScoreError> {
    if answer_key.len() != submissions.len() {
        return Err(ScoreError::LengthMismatch {
            expected: answer_key.len(),
            actual: submissions.len(),
        });
    }

    let mut items = Vec::with_capacity(answer_key.len());
    let mut correct_count = 0;

    for (i, (correct, sub)) in answer_key.iter().zip(submissions).enumerate() {
        let is_correct = sub.answer.trim() == correct.trim();
        if is_correct {
            correct_count += 1;
        }
        items.push(ScoredItem {
            number: i + 1,
            given: sub.answer.clone(),
            correct: correct.clone(),
            is_correct,
            elapsed: sub.elapsed.clone(),
            rationale: sub.rationale.clone(),
            confidence: sub.confidence,
        });
    }

    let total_count = answer_key.len();
    let percentage = if total_count == 0 {
        0
    } else {
        ((correct_count as f64 / total_count as f64) * 100.0).round() as u32
    };

    Ok((
        items,
        ScoreSummary {
            correct_count,
            total_count,
            percentage,
        },
    ))
}
