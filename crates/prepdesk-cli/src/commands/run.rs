//! The `prepdesk run` command: drive a scripted interview session.
//!
//! The CLI plays the transport role for local practice runs: it feeds the
//! scripted telemetry stream, submits each answer, and delivers every
//! pending prompt exactly once.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use prepdesk_core::report::{QuestionPoints, Report};
use prepdesk_core::session::{InterviewEngine, SessionStore, StartRequest};
use prepdesk_core::telemetry::SampleUpdate;

/// A scripted session: one header plus one step per question.
#[derive(Debug, Deserialize)]
struct SessionScript {
    session: ScriptHeader,
    #[serde(default)]
    steps: Vec<ScriptStep>,
}

#[derive(Debug, Deserialize)]
struct ScriptHeader {
    role: String,
    #[serde(default = "default_questions")]
    questions: usize,
    #[serde(default)]
    topics: Vec<String>,
}

fn default_questions() -> usize {
    3
}

#[derive(Debug, Deserialize)]
struct ScriptStep {
    /// Free-text answer for behavioral questions.
    #[serde(default)]
    text: Option<String>,
    /// Choice for MCQ questions.
    #[serde(default)]
    choice: Option<String>,
    /// Telemetry samples delivered while this question is current.
    #[serde(default)]
    telemetry: Vec<SampleUpdate>,
}

pub fn execute(bank_path: PathBuf, script_path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let bank = prepdesk_bank::parser::load_bank(&bank_path)?;

    let content = std::fs::read_to_string(&script_path)
        .with_context(|| format!("failed to read script: {}", script_path.display()))?;
    let script: SessionScript = toml::from_str(&content)
        .with_context(|| format!("failed to parse script: {}", script_path.display()))?;

    let engine = InterviewEngine::new(Arc::new(SessionStore::new()), Arc::new(bank));
    let session_id = format!("cli-{}", chrono::Utc::now().format("%Y%m%dT%H%M%S%3f"));

    let outcome = engine.start(StartRequest {
        session_id: session_id.clone(),
        role: script.session.role.clone(),
        topics: script.session.topics.clone(),
        question_count: script.session.questions,
    });
    let first = match &outcome.question {
        Some(question) => question,
        None => anyhow::bail!(
            "no questions available for role '{}'",
            script.session.role
        ),
    };

    if let Some(prompt) = engine.take_prompt(&session_id) {
        eprintln!("{prompt}");
    }
    eprintln!("[1/{}] {}", outcome.question_count, first.prompt);

    let mut index = 1;
    for step in &script.steps {
        for update in &step.telemetry {
            engine.record_telemetry(&session_id, update);
        }
        let advance = engine.advance(&session_id, step.text.as_deref(), step.choice.as_deref());
        if let Some(prompt) = engine.take_prompt(&session_id) {
            eprintln!("{prompt}");
        }
        if advance.done {
            break;
        }
        if let Some(next) = &advance.question {
            index += 1;
            eprintln!("[{index}/{}] {}", outcome.question_count, next.prompt);
        }
    }

    let report = engine.finish(&session_id);
    print_report(&report);

    if let Some(dir) = output {
        std::fs::create_dir_all(&dir)?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let path = dir.join(format!("report-{timestamp}.json"));
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_report(report: &Report) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Question", "Type", "Points", "Max"]);
    for entry in &report.per_question {
        match entry {
            QuestionPoints::Mcq {
                question_id,
                points,
                max_points,
                correct,
                ..
            } => {
                table.add_row(vec![
                    Cell::new(question_id),
                    Cell::new(if *correct { "MCQ (correct)" } else { "MCQ" }),
                    Cell::new(format!("{points:.2}")),
                    Cell::new(format!("{max_points:.0}")),
                ]);
            }
            QuestionPoints::Behavioral {
                question_id,
                points,
                max_points,
                ..
            } => {
                table.add_row(vec![
                    Cell::new(question_id),
                    Cell::new("Behavioral"),
                    Cell::new(format!("{points:.2}")),
                    Cell::new(format!("{max_points:.0}")),
                ]);
            }
        }
    }

    println!("\n{table}");
    println!(
        "Total points: {:.2} / {:.2}",
        report.total_points, report.max_points
    );
    println!("Overall: {:.1}%", report.overall);
    for line in &report.feedback {
        println!("  {line}");
    }
    if !report.strengths.is_empty() {
        println!("\nStrengths:");
        for s in &report.strengths {
            println!("  + {s}");
        }
    }
    if !report.improvements.is_empty() {
        println!("\nAreas to improve:");
        for s in &report.improvements {
            println!("  - {s}");
        }
    }
}
