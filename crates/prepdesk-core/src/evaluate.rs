//! Answer evaluation: MCQ exact-match and the text-overlap heuristic.
//!
//! The free-text scorer is a crude lexical proxy, not semantic scoring:
//! reference tokens are matched as substrings of the submitted text with
//! no stemming or synonymy. Known limitation, kept deliberately.

use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Result of evaluating one submitted answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Score in [0, 1].
    pub score: f64,
    pub detail: EvaluationDetail,
}

/// Type-specific evaluation detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EvaluationDetail {
    Mcq { correct: bool },
    Overlap { hits: usize, total: usize },
}

/// Evaluate a submitted answer against its question definition.
///
/// Never fails: a missing text or choice degrades to the empty string.
pub fn evaluate(question: &Question, text: Option<&str>, choice: Option<&str>) -> Evaluation {
    if let Some(answer_key) = question.kind.answer_key() {
        let correct = choice.unwrap_or("").trim() == answer_key.trim();
        Evaluation {
            score: if correct { 1.0 } else { 0.0 },
            detail: EvaluationDetail::Mcq { correct },
        }
    } else {
        overlap_score(question.kind.solution(), text.unwrap_or(""))
    }
}

/// Keyword-overlap ratio between a reference solution and submitted text.
///
/// The reference is lower-cased and split on whitespace and commas into
/// tokens longer than two characters (a length filter stands in for a
/// stopword list). Repeated reference tokens count separately. Answers
/// longer than 50 characters get a +0.1 bonus, capped at 1.0.
fn overlap_score(solution: &str, text: &str) -> Evaluation {
    let gold = solution.to_lowercase().replace(',', " ");
    let text = text.to_lowercase();

    let tokens: Vec<&str> = gold
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .collect();
    let hits = tokens.iter().filter(|w| text.contains(**w)).count();
    let ratio = hits as f64 / tokens.len().max(1) as f64;

    let bonus = if text.chars().count() > 50 { 0.1 } else { 0.0 };
    Evaluation {
        score: (ratio + bonus).min(1.0),
        detail: EvaluationDetail::Overlap {
            hits,
            total: tokens.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn mcq(answer: &str) -> Question {
        Question {
            id: "m1".into(),
            prompt: "pick one".into(),
            kind: QuestionKind::Mcq {
                options: vec!["A".into(), "B".into()],
                answer: answer.into(),
            },
        }
    }

    fn behavioral(solution: &str) -> Question {
        Question {
            id: "b1".into(),
            prompt: "tell me about".into(),
            kind: QuestionKind::Behavioral {
                solution: solution.into(),
            },
        }
    }

    #[test]
    fn mcq_exact_match_trimmed() {
        let q = mcq("B");
        assert_eq!(evaluate(&q, None, Some("B")).score, 1.0);
        assert_eq!(evaluate(&q, None, Some("  B ")).score, 1.0);
        // Case-sensitive: only edge whitespace is forgiven.
        assert_eq!(evaluate(&q, None, Some("b")).score, 0.0);
        assert_eq!(evaluate(&q, None, Some("A")).score, 0.0);
    }

    #[test]
    fn mcq_missing_choice_scores_zero() {
        let eval = evaluate(&mcq("A"), None, None);
        assert_eq!(eval.score, 0.0);
        assert!(matches!(
            eval.detail,
            EvaluationDetail::Mcq { correct: false }
        ));
    }

    #[test]
    fn overlap_counts_repeated_tokens_separately() {
        // "team" appears twice in the reference and matches twice.
        let q = behavioral("team conflict team");
        let eval = evaluate(&q, Some("we resolved the team conflict"), None);
        match eval.detail {
            EvaluationDetail::Overlap { hits, total } => {
                assert_eq!(hits, 3);
                assert_eq!(total, 3);
            }
            _ => panic!("expected overlap detail"),
        }
        assert_eq!(eval.score, 1.0);
    }

    #[test]
    fn overlap_skips_short_tokens_and_splits_commas() {
        let q = behavioral("we, ran an A/B test, ok");
        // Surviving tokens (> 2 chars): "ran", "a/b", "test".
        let eval = evaluate(&q, Some("ran a/b test"), None);
        match eval.detail {
            EvaluationDetail::Overlap { hits, total } => {
                assert_eq!(total, 3);
                assert_eq!(hits, 3);
            }
            _ => panic!("expected overlap detail"),
        }
    }

    #[test]
    fn long_answers_get_length_bonus() {
        let q = behavioral("ownership borrowing lifetimes");
        let short = evaluate(&q, Some("ownership"), None);
        assert!((short.score - 1.0 / 3.0).abs() < 1e-9);

        let long = evaluate(
            &q,
            Some("ownership is the core idea, and the borrow checker enforces it at compile time"),
            None,
        );
        assert!((long.score - (1.0 / 3.0 + 0.1)).abs() < 1e-9);
    }

    #[test]
    fn bonus_never_pushes_past_one() {
        let q = behavioral("ownership");
        let text = "ownership ".repeat(10);
        assert_eq!(evaluate(&q, Some(&text), None).score, 1.0);
    }

    #[test]
    fn empty_solution_scores_zero_not_panic() {
        let q = behavioral("");
        let eval = evaluate(&q, Some("anything at all"), None);
        assert_eq!(eval.score, 0.0);
        assert!(matches!(
            eval.detail,
            EvaluationDetail::Overlap { hits: 0, total: 0 }
        ));
    }

    #[test]
    fn open_kind_scores_generically() {
        let q = Question {
            id: "t1".into(),
            prompt: "explain caching".into(),
            kind: QuestionKind::Open {
                label: "Technical".into(),
                solution: "cache invalidation eviction".into(),
            },
        };
        let eval = evaluate(&q, Some("eviction policies and cache sizing"), None);
        assert!(eval.score > 0.0);
    }
}
