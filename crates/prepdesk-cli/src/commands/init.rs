//! The `prepdesk init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create example role bank
    std::fs::create_dir_all("banks")?;
    let bank_path = std::path::Path::new("banks/example.toml");
    if bank_path.exists() {
        println!("banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(bank_path, EXAMPLE_BANK)?;
        println!("Created banks/example.toml");
    }

    // Create example session script
    let script_path = std::path::Path::new("session.toml");
    if script_path.exists() {
        println!("session.toml already exists, skipping.");
    } else {
        std::fs::write(script_path, EXAMPLE_SCRIPT)?;
        println!("Created session.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit banks/example.toml with your role's questions");
    println!("  2. Run: prepdesk validate --bank banks/example.toml");
    println!("  3. Run: prepdesk run --bank banks/example.toml --script session.toml");

    Ok(())
}

const EXAMPLE_BANK: &str = r#"[bank]
role = "Software Engineer"

[[mcq]]
id = "se-mcq-1"
prompt = "Which data structure offers average O(1) lookup by key?"
options = ["Hash map", "Binary search tree", "Linked list", "Sorted array"]
answer = "Hash map"

[[mcq]]
id = "se-mcq-2"
prompt = "Which HTTP status code signals a resource was not found?"
options = ["200", "301", "404", "502"]
answer = "404"

[[behavioral]]
id = "se-beh-1"
prompt = "Tell me about a time you had to debug a production incident under pressure."
solution = "incident, logs, metrics, rollback, root cause, postmortem, communication"

[[behavioral]]
id = "se-beh-2"
prompt = "Describe a situation where you disagreed with a teammate on a technical decision."
solution = "disagreement, listening, tradeoffs, data, compromise, outcome"
"#;

const EXAMPLE_SCRIPT: &str = r#"[session]
role = "Software Engineer"
questions = 3

# One step per question, in interview order. MCQ steps use `choice`,
# behavioral steps use `text`. Telemetry entries are applied before the
# answer is submitted.

[[steps]]
choice = "Hash map"

[[steps.telemetry]]
pace = 140.0

[[steps]]
choice = "404"

[[steps]]
text = """
During a production incident I started with the logs and metrics to narrow
the blast radius, rolled back the offending deploy, then traced the root
cause and wrote up a postmortem with clear communication to the team.
"""

[[steps.telemetry]]
pace = 130.0
filler_increment = 2
eye_contact = 80.0
"#;
