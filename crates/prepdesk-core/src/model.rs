//! Core data model types for prepdesk.
//!
//! These are the fundamental types the entire prepdesk system uses to
//! represent questions, submitted answers, and per-question records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single interview question, immutable once drawn from the bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within the role bank.
    pub id: String,
    /// The question text shown to the candidate.
    pub prompt: String,
    /// Type-specific payload.
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Type-specific question payload.
///
/// MCQ and behavioral questions are first-class; any externally-defined
/// type is carried as [`QuestionKind::Open`] and scored generically via
/// the text-overlap heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    Mcq {
        options: Vec<String>,
        /// The correct choice, compared trimmed and case-sensitive.
        answer: String,
    },
    Behavioral {
        /// Reference solution used by the overlap scorer.
        #[serde(default)]
        solution: String,
    },
    /// STAR-format questions score exactly like behavioral ones.
    Star {
        #[serde(default)]
        solution: String,
    },
    /// Any other externally-defined type (e.g. "Technical").
    Open {
        /// The original type label from the bank.
        label: String,
        #[serde(default)]
        solution: String,
    },
}

impl QuestionKind {
    /// Human-readable type label, used in transition prompts.
    pub fn label(&self) -> &str {
        match self {
            QuestionKind::Mcq { .. } => "MCQ",
            QuestionKind::Behavioral { .. } => "Behavioral",
            QuestionKind::Star { .. } => "STAR",
            QuestionKind::Open { label, .. } => label,
        }
    }

    /// Section classification exposed to the transport. Other types have none.
    pub fn section(&self) -> Option<Section> {
        match self {
            QuestionKind::Mcq { .. } => Some(Section::Mcq),
            QuestionKind::Behavioral { .. } | QuestionKind::Star { .. } => {
                Some(Section::Behavioral)
            }
            QuestionKind::Open { .. } => None,
        }
    }

    pub fn is_mcq(&self) -> bool {
        matches!(self, QuestionKind::Mcq { .. })
    }

    /// Behavioral for point scoring purposes: `behavioral` or `star`.
    pub fn is_behavioral(&self) -> bool {
        matches!(
            self,
            QuestionKind::Behavioral { .. } | QuestionKind::Star { .. }
        )
    }

    /// Reference solution for the overlap scorer. Empty for MCQ.
    pub fn solution(&self) -> &str {
        match self {
            QuestionKind::Mcq { .. } => "",
            QuestionKind::Behavioral { solution }
            | QuestionKind::Star { solution }
            | QuestionKind::Open { solution, .. } => solution,
        }
    }

    /// The MCQ answer key, if this is an MCQ.
    pub fn answer_key(&self) -> Option<&str> {
        match self {
            QuestionKind::Mcq { answer, .. } => Some(answer),
            _ => None,
        }
    }
}

/// Category classification returned alongside questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "MCQ")]
    Mcq,
    Behavioral,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Mcq => write!(f, "MCQ"),
            Section::Behavioral => write!(f, "Behavioral"),
        }
    }
}

/// The record appended when a question is answered, one per consumed
/// question, in question order. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    /// The answered question's payload, kept for report detail.
    pub kind: QuestionKind,
    pub question_text: String,
    /// Free-text answer, if one was submitted.
    pub answer_text: Option<String>,
    /// MCQ choice, if one was submitted.
    pub chosen: Option<String>,
    /// Raw evaluator score in [0, 1].
    pub score: f64,
    /// Content score for non-MCQ questions. None for MCQ.
    pub text_score: Option<f64>,
    /// Delivery scalar snapshotted at submission time, 0.0 when no
    /// telemetry was recorded for the question.
    pub delivery_score: f64,
    /// MCQ correctness flag. None for other types.
    pub correct: Option<bool>,
}

impl AnswerRecord {
    /// The behavioral combined score: 0.7 × content + 0.3 × delivery.
    pub fn combined_score(&self) -> f64 {
        0.7 * self.text_score.unwrap_or(0.0) + 0.3 * self.delivery_score
    }
}
