//! TOML role-bank parser.
//!
//! Loads role banks from TOML files and directories, and validates them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{QuestionBank, RoleBank};

/// Intermediate TOML structure for parsing role bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    mcq: Vec<TomlMcq>,
    #[serde(default)]
    behavioral: Vec<TomlBehavioral>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    role: String,
}

#[derive(Debug, Deserialize)]
struct TomlMcq {
    id: String,
    prompt: String,
    #[serde(default)]
    options: Vec<String>,
    answer: String,
}

#[derive(Debug, Deserialize)]
struct TomlBehavioral {
    id: String,
    prompt: String,
    #[serde(default)]
    solution: String,
}

/// Parse a single TOML file into a `RoleBank`.
pub fn parse_role_bank(path: &Path) -> Result<RoleBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;
    parse_role_bank_str(&content, path)
}

/// Parse a TOML string into a `RoleBank` (useful for testing).
pub fn parse_role_bank_str(content: &str, source_path: &Path) -> Result<RoleBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut bank = RoleBank::new(parsed.bank.role);
    for q in parsed.mcq {
        bank.push_mcq(&q.id, &q.prompt, q.options, &q.answer);
    }
    for q in parsed.behavioral {
        bank.push_behavioral(&q.id, &q.prompt, &q.solution);
    }
    Ok(bank)
}

/// Load a `QuestionBank` from a single file or a directory of `.toml`
/// files (recursively). Unparseable files are skipped with a warning.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let mut bank = QuestionBank::new();
    if path.is_dir() {
        load_bank_directory(path, &mut bank)?;
    } else {
        bank.insert_role(parse_role_bank(path)?);
    }
    Ok(bank)
}

fn load_bank_directory(dir: &Path, bank: &mut QuestionBank) -> Result<()> {
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            load_bank_directory(&path, bank)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_role_bank(&path) {
                Ok(role) => bank.insert_role(role),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }
    Ok(())
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a role bank for common issues.
pub fn validate_role_bank(bank: &RoleBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate ids across both pools
    let mut seen_ids = std::collections::HashSet::new();
    for question in bank.mcq.iter().chain(&bank.behavioral) {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    // Empty prompts
    for question in bank.mcq.iter().chain(&bank.behavioral) {
        if question.prompt.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "prompt is empty".into(),
            });
        }
    }

    // MCQ whose answer key is not among its options
    for question in &bank.mcq {
        if let prepdesk_core::model::QuestionKind::Mcq { options, answer } = &question.kind {
            if !options.iter().any(|o| o.trim() == answer.trim()) {
                warnings.push(ValidationWarning {
                    question_id: Some(question.id.clone()),
                    message: format!("answer '{answer}' is not among the options"),
                });
            }
        }
    }

    // Behavioral questions without a reference solution score zero overlap
    for question in &bank.behavioral {
        if question.kind.solution().trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "behavioral question has no reference solution".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
role = "Software Engineer"

[[mcq]]
id = "se-mcq-1"
prompt = "Which data structure gives average O(1) lookup by key?"
options = ["Hash map", "Binary search tree", "Linked list", "Sorted array"]
answer = "Hash map"

[[mcq]]
id = "se-mcq-2"
prompt = "Which HTTP status code indicates a client error?"
options = ["200", "301", "404", "502"]
answer = "404"

[[behavioral]]
id = "se-beh-1"
prompt = "Tell me about a time you disagreed with a teammate."
solution = "conflict, listening, compromise, outcome, retrospective"
"#;

    #[test]
    fn parse_valid_bank() {
        let bank = parse_role_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bank.role, "Software Engineer");
        assert_eq!(bank.mcq.len(), 2);
        assert_eq!(bank.behavioral.len(), 1);
        assert_eq!(bank.mcq[0].kind.answer_key(), Some("Hash map"));
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[bank]
role = "Minimal"

[[behavioral]]
id = "b1"
prompt = "Describe a challenge."
"#;
        let bank = parse_role_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bank.behavioral.len(), 1);
        assert_eq!(bank.behavioral[0].kind.solution(), "");
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_role_bank_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn validate_duplicate_ids() {
        let toml = r#"
[bank]
role = "Dupes"

[[mcq]]
id = "same"
prompt = "First?"
options = ["A"]
answer = "A"

[[behavioral]]
id = "same"
prompt = "Second?"
solution = "words"
"#;
        let bank = parse_role_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_role_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
    }

    #[test]
    fn validate_answer_not_in_options() {
        let toml = r#"
[bank]
role = "Broken"

[[mcq]]
id = "m1"
prompt = "Pick one."
options = ["A", "B"]
answer = "C"
"#;
        let bank = parse_role_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_role_bank(&bank);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("not among the options")));
    }

    #[test]
    fn validate_missing_solution() {
        let toml = r#"
[bank]
role = "NoSolution"

[[behavioral]]
id = "b1"
prompt = "Describe something."
"#;
        let bank = parse_role_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_role_bank(&bank);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("no reference solution")));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("se.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let bank = load_bank(dir.path()).unwrap();
        assert_eq!(bank.len(), 1);
        assert!(bank.role("Software Engineer").is_some());
    }

    #[test]
    fn load_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("se.toml");
        std::fs::write(&path, VALID_TOML).unwrap();

        let bank = load_bank(&path).unwrap();
        assert_eq!(bank.len(), 1);
    }
}
