//! Final report aggregation: points, category breakdown, and narrative.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::AnswerRecord;
use crate::session::Session;

/// Maximum points awarded per behavioral question.
const BEHAVIORAL_MAX_POINTS: f64 = 5.0;
/// A behavioral combined score below this triggers an improvement note.
const WEAK_BEHAVIORAL_THRESHOLD: f64 = 0.6;

/// The final interview report. Derived fresh from the answer history on
/// every call; never stored on the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub session_id: String,
    /// Legacy compatibility percentage: category averages weighted by
    /// their share of answered questions, in [0, 100].
    pub overall: f64,
    pub correct_mcq: u32,
    pub total_mcq: u32,
    pub total_points: f64,
    pub max_points: f64,
    pub breakdown: Breakdown,
    pub per_question: Vec<QuestionPoints>,
    pub feedback: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// Category percentages plus the delivery summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Breakdown {
    /// MCQ accuracy as a percentage.
    pub mcq_accuracy: f64,
    /// Mean behavioral combined score as a percentage.
    pub behavioral: f64,
    /// Mean raw score of other question types as a percentage.
    pub technical: f64,
    pub delivery: DeliverySummary,
}

/// Delivery metrics summarized across the whole session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliverySummary {
    /// Straight mean over every pace reading, flattened across questions.
    pub avg_pace: f64,
    /// Filler counts summed across questions.
    pub total_fillers: u32,
    /// Mean per-question eye-contact duration, normalized to [0, 1].
    pub avg_eye_contact: f64,
    /// Mean per-question engagement, in [0, 1].
    pub avg_engagement: f64,
}

/// Per-question point detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionPoints {
    Mcq {
        question_id: String,
        points: f64,
        max_points: f64,
        question: String,
        correct: bool,
        chosen: Option<String>,
        answer: String,
    },
    Behavioral {
        question_id: String,
        points: f64,
        max_points: f64,
        text_score: f64,
        delivery_score: f64,
        question: String,
    },
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

impl Report {
    /// Aggregate the session's answer history into the final report.
    pub fn build(session: &Session) -> Self {
        let answers = &session.answers;

        let total_mcq = answers.iter().filter(|a| a.kind.is_mcq()).count() as u32;
        let correct_mcq = answers
            .iter()
            .filter(|a| a.correct == Some(true))
            .count() as u32;

        let mut per_question = Vec::with_capacity(answers.len());
        let mut total_points = 0.0;
        let mut max_points = 0.0;
        let mut behavioral_combined = Vec::new();
        let mut technical_scores = Vec::new();

        for record in answers {
            if record.kind.is_mcq() {
                let correct = record.correct.unwrap_or(false);
                let points = if correct { 1.0 } else { 0.0 };
                per_question.push(QuestionPoints::Mcq {
                    question_id: record.question_id.clone(),
                    points,
                    max_points: 1.0,
                    question: record.question_text.clone(),
                    correct,
                    chosen: record.chosen.clone(),
                    answer: record.kind.answer_key().unwrap_or("").to_string(),
                });
                total_points += points;
                max_points += 1.0;
            } else if record.kind.is_behavioral() {
                let combined = record.combined_score();
                let points = round2(combined * BEHAVIORAL_MAX_POINTS);
                per_question.push(QuestionPoints::Behavioral {
                    question_id: record.question_id.clone(),
                    points,
                    max_points: BEHAVIORAL_MAX_POINTS,
                    text_score: round2(record.text_score.unwrap_or(0.0)),
                    delivery_score: round2(record.delivery_score),
                    question: record.question_text.clone(),
                });
                total_points += points;
                max_points += BEHAVIORAL_MAX_POINTS;
                behavioral_combined.push(combined);
            } else {
                technical_scores.push(record.score);
            }
        }

        let behavioral_avg = mean(behavioral_combined.iter().copied());
        let technical_avg = mean(technical_scores.iter().copied());
        let mcq_accuracy = f64::from(correct_mcq) / f64::from(total_mcq.max(1));
        let total_q = answers.len().max(1) as f64;
        let overall = round1(
            100.0
                * ((behavioral_combined.len() as f64 / total_q) * behavioral_avg
                    + (technical_scores.len() as f64 / total_q) * technical_avg
                    + (f64::from(total_mcq) / total_q) * mcq_accuracy),
        );

        let delivery = summarize_delivery(session);
        let feedback = feedback_lines(total_mcq, correct_mcq, !behavioral_combined.is_empty(), &delivery);
        let (strengths, improvements) =
            narrative(&delivery, total_mcq, correct_mcq, answers);

        Report {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            session_id: session.id.clone(),
            overall,
            correct_mcq,
            total_mcq,
            total_points: round2(total_points),
            max_points: round2(max_points),
            breakdown: Breakdown {
                mcq_accuracy: round1(mcq_accuracy * 100.0),
                behavioral: round1(behavioral_avg * 100.0),
                technical: round1(technical_avg * 100.0),
                delivery,
            },
            per_question,
            feedback,
            strengths,
            improvements,
        }
    }

    /// The soft failure for an unknown session id: everything zeroed, a
    /// single note, no error raised.
    pub fn not_found(session_id: &str) -> Self {
        Report {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            session_id: session_id.to_string(),
            overall: 0.0,
            correct_mcq: 0,
            total_mcq: 0,
            total_points: 0.0,
            max_points: 0.0,
            breakdown: Breakdown::default(),
            per_question: Vec::new(),
            feedback: vec!["Session not found".to_string()],
            strengths: Vec::new(),
            improvements: Vec::new(),
        }
    }

    /// Save the report as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}

/// Summarize delivery telemetry across all recorded samples. Pace is a
/// straight mean of the underlying readings, not a mean of per-question
/// means; eye contact and engagement average per question.
fn summarize_delivery(session: &Session) -> DeliverySummary {
    let samples: Vec<_> = session.telemetry.values().collect();
    let avg_pace = mean(samples.iter().flat_map(|s| s.pace_readings.iter().copied()));
    let total_fillers = samples.iter().map(|s| s.filler_count).sum();
    let avg_eye_contact = mean(samples.iter().map(|s| s.eye_contact_duration / 100.0));
    let avg_engagement = mean(samples.iter().map(|s| s.engagement_score));
    DeliverySummary {
        avg_pace: round1(avg_pace),
        total_fillers,
        avg_eye_contact: round2(avg_eye_contact),
        avg_engagement: round2(avg_engagement),
    }
}

fn feedback_lines(
    total_mcq: u32,
    correct_mcq: u32,
    any_behavioral: bool,
    delivery: &DeliverySummary,
) -> Vec<String> {
    let mut lines = Vec::new();
    if total_mcq > 0 {
        lines.push(format!("MCQ: {correct_mcq}/{total_mcq} correct."));
    }
    if any_behavioral {
        lines.push(
            "Behavioral: content (70%) and delivery (30%) combined for scoring.".to_string(),
        );
    }
    let pace_label = if delivery.avg_pace >= 130.0 {
        "Excellent"
    } else if delivery.avg_pace >= 100.0 {
        "Good"
    } else {
        "Moderate"
    };
    lines.push(format!(
        "Speaking pace {pace_label} (~{:.0} WPM). Filler words: {}. Avg eye contact: {:.0}%.",
        delivery.avg_pace,
        delivery.total_fillers,
        delivery.avg_eye_contact * 100.0
    ));
    lines
}

/// The fixed-order narrative rule table. Each rule appends independently
/// to either strengths or improvements.
fn narrative(
    delivery: &DeliverySummary,
    total_mcq: u32,
    correct_mcq: u32,
    answers: &[AnswerRecord],
) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();

    if delivery.avg_pace >= 130.0 {
        strengths.push("Excellent speaking pace indicating confidence (>=130 WPM).".to_string());
    } else if delivery.avg_pace >= 100.0 {
        strengths.push("Good speaking pace (~100-129 WPM).".to_string());
    } else {
        improvements
            .push("Increase speaking pace to improve confidence and engagement.".to_string());
    }

    if delivery.total_fillers <= 5 {
        strengths.push("Low filler usage helped clarity.".to_string());
    } else if delivery.total_fillers > 10 {
        improvements.push(format!(
            "Reduce filler words (total: {}). Practice brief pauses instead of fillers.",
            delivery.total_fillers
        ));
    }

    if delivery.avg_eye_contact >= 0.7 {
        strengths.push("Strong eye contact maintained (>=70%).".to_string());
    } else if delivery.avg_eye_contact < 0.5 {
        improvements.push(
            "Improve eye contact toward camera to convey confidence (<50% detected).".to_string(),
        );
    }

    if total_mcq > 0 {
        let accuracy = f64::from(correct_mcq) / f64::from(total_mcq);
        if accuracy >= 0.8 {
            strengths.push(format!("High MCQ accuracy ({correct_mcq}/{total_mcq})."));
        } else if accuracy < 0.6 {
            improvements.push(format!(
                "Reinforce core concepts to improve MCQ accuracy ({correct_mcq}/{total_mcq})."
            ));
        }
    }

    // Weakest behavioral answer; ties keep the earliest in answer order.
    let weakest = answers
        .iter()
        .filter(|a| a.kind.is_behavioral())
        .fold(None::<(&AnswerRecord, f64)>, |acc, record| {
            let combined = record.combined_score();
            match acc {
                Some((_, best)) if combined >= best => acc,
                _ => Some((record, combined)),
            }
        });
    if let Some((record, combined)) = weakest {
        if combined < WEAK_BEHAVIORAL_THRESHOLD {
            improvements.push(format!(
                "Behavioral question {}: content and delivery could go deeper (combined score below 0.6).",
                record.question_id
            ));
        }
    }

    (strengths, improvements)
}
