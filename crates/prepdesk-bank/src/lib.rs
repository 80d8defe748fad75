//! prepdesk-bank — Static role question banks and selection policy.
//!
//! Banks are loaded from TOML files, one role per file (see [`parser`]),
//! and implement the [`QuestionSource`] seam consumed by the session
//! engine. Selection is deterministic: fixed MCQ/behavioral split, bank
//! declaration order, no randomization.

pub mod parser;

use std::collections::HashMap;

use prepdesk_core::model::{Question, QuestionKind};
use prepdesk_core::session::QuestionSource;

/// The MCQ and behavioral pools declared for one role.
#[derive(Debug, Clone)]
pub struct RoleBank {
    pub role: String,
    pub mcq: Vec<Question>,
    pub behavioral: Vec<Question>,
}

/// All role banks, keyed by role name.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    roles: HashMap<String, RoleBank>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_role(&mut self, bank: RoleBank) {
        self.roles.insert(bank.role.clone(), bank);
    }

    pub fn role(&self, name: &str) -> Option<&RoleBank> {
        self.roles.get(name)
    }

    pub fn roles(&self) -> impl Iterator<Item = &RoleBank> {
        self.roles.values()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Select questions for a session: MCQ block first, then behavioral.
    ///
    /// `mcq = ceil(count / 2)`, `behavioral = count - mcq`, both taken in
    /// bank-declared order and truncated when a pool runs short. Other
    /// question types are never substituted. An unknown role yields an
    /// empty selection rather than an error. `requested_types` is
    /// accepted for interface compatibility with transports that send UI
    /// type labels; the split policy is fixed regardless.
    pub fn select_questions(
        &self,
        role: &str,
        _requested_types: &[String],
        count: usize,
    ) -> Vec<Question> {
        let Some(bank) = self.roles.get(role) else {
            tracing::warn!(role, "no bank for role, empty selection");
            return Vec::new();
        };

        let total = count.max(1);
        let mcq_count = total.div_ceil(2);
        let behavioral_count = total - mcq_count;

        let mut selected = Vec::with_capacity(total);
        selected.extend(bank.mcq.iter().take(mcq_count).cloned());
        selected.extend(bank.behavioral.iter().take(behavioral_count).cloned());
        selected
    }
}

impl QuestionSource for QuestionBank {
    fn select(&self, role: &str, requested_types: &[String], count: usize) -> Vec<Question> {
        self.select_questions(role, requested_types, count)
    }
}

/// Build a role bank from raw question lists, tagging kinds.
impl RoleBank {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            mcq: Vec::new(),
            behavioral: Vec::new(),
        }
    }

    pub fn push_mcq(&mut self, id: &str, prompt: &str, options: Vec<String>, answer: &str) {
        self.mcq.push(Question {
            id: id.into(),
            prompt: prompt.into(),
            kind: QuestionKind::Mcq {
                options,
                answer: answer.into(),
            },
        });
    }

    pub fn push_behavioral(&mut self, id: &str, prompt: &str, solution: &str) {
        self.behavioral.push(Question {
            id: id.into(),
            prompt: prompt.into(),
            kind: QuestionKind::Behavioral {
                solution: solution.into(),
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_4_and_4() -> QuestionBank {
        let mut role = RoleBank::new("Software Engineer");
        for i in 1..=4 {
            role.push_mcq(
                &format!("mcq-{i}"),
                &format!("mcq prompt {i}"),
                vec!["A".into(), "B".into()],
                "A",
            );
            role.push_behavioral(
                &format!("beh-{i}"),
                &format!("behavioral prompt {i}"),
                "teamwork conflict resolution",
            );
        }
        let mut bank = QuestionBank::new();
        bank.insert_role(role);
        bank
    }

    #[test]
    fn split_is_ceil_half_mcq_then_behavioral_in_bank_order() {
        let bank = bank_4_and_4();
        let selected = bank.select_questions("Software Engineer", &[], 3);
        let ids: Vec<_> = selected.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["mcq-1", "mcq-2", "beh-1"]);
    }

    #[test]
    fn even_count_splits_evenly() {
        let bank = bank_4_and_4();
        let selected = bank.select_questions("Software Engineer", &[], 4);
        let ids: Vec<_> = selected.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["mcq-1", "mcq-2", "beh-1", "beh-2"]);
    }

    #[test]
    fn short_pools_truncate_without_substitution() {
        let mut role = RoleBank::new("Thin Role");
        role.push_mcq("only-mcq", "p", vec!["A".into()], "A");
        let mut bank = QuestionBank::new();
        bank.insert_role(role);

        // Asks for 3 MCQ + 2 behavioral; only 1 MCQ exists and no behavioral.
        let selected = bank.select_questions("Thin Role", &[], 5);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "only-mcq");
    }

    #[test]
    fn zero_count_is_lifted_to_one() {
        let bank = bank_4_and_4();
        let selected = bank.select_questions("Software Engineer", &[], 0);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "mcq-1");
    }

    #[test]
    fn unknown_role_yields_empty_selection() {
        let bank = bank_4_and_4();
        assert!(bank.select_questions("Astronaut", &[], 3).is_empty());
    }
}
