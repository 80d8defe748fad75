//! The `prepdesk validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = prepdesk_bank::parser::load_bank(&bank_path)?;

    let mut total_warnings = 0;

    let mut roles: Vec<_> = bank.roles().collect();
    roles.sort_by(|a, b| a.role.cmp(&b.role));

    for role in roles {
        println!(
            "Role bank: {} ({} MCQ, {} behavioral)",
            role.role,
            role.mcq.len(),
            role.behavioral.len()
        );

        let warnings = prepdesk_bank::parser::validate_role_bank(role);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All question banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
