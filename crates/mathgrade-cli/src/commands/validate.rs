//! The `mathgrade validate` command.

use std::path::PathBuf;

use anyhow::Result;

use mathgrade_core::parser;

pub fn execute(input: PathBuf) -> Result<()> {
    let batches = if input.is_dir() {
        parser::load_batch_directory(&input)?
    } else {
        vec![parser::parse_attempt_batch(&input)?]
    };

    let mut total_warnings = 0;

    for batch in &batches {
        println!(
            "Batch: {} ({} responses)",
            batch.grade.as_deref().unwrap_or("no grade"),
            batch.responses.len()
        );

        let warnings = parser::validate_batch(batch);
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
        println!("All attempt batches valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
