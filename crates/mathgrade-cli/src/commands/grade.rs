//! The `mathgrade grade` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mathgrade_core::model::Grade;
use mathgrade_core::parser;
use mathgrade_core::report::{Report, SavedReport};

use crate::config::load_config_from;

pub fn execute(
    input: PathBuf,
    grade: Option<String>,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let format = format.unwrap_or(config.default_format);
    let formats: Vec<&str> = match format.as_str() {
        "all" => vec!["json", "markdown"],
        "json" => vec!["json"],
        "markdown" | "md" => vec!["markdown"],
        other => anyhow::bail!("unknown format '{other}', expected json, markdown or all"),
    };

    let batch = parser::parse_attempt_batch(&input)?;
    if batch.skipped > 0 {
        eprintln!(
            "Warning: skipped {} unreadable record(s) in {}",
            batch.skipped,
            input.display()
        );
    }

    let grade = grade
        .or(batch.grade)
        .unwrap_or(config.default_grade);
    if Grade::parse(&grade).level().is_none() {
        eprintln!("Warning: unrecognized grade '{grade}', using the upper-grade feedback");
    }

    eprintln!(
        "mathgrade v{}: grading {} responses for {grade}",
        env!("CARGO_PKG_VERSION"),
        batch.responses.len()
    );

    let report = mathgrade_core::generate_report(&batch.responses, &grade);
    print_summary(&report);

    let output = output.unwrap_or(config.output_dir);
    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    for fmt in formats {
        match fmt {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                let saved = SavedReport::new(
                    report.clone(),
                    grade.clone(),
                    Some(input.display().to_string()),
                );
                saved.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            _ => {
                let path = output.join(format!("report-{timestamp}.md"));
                let markdown = format!("# mathgrade report: {grade}\n\n{}", report.to_markdown());
                std::fs::write(&path, markdown)?;
                eprintln!("Markdown report: {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_summary(report: &Report) {
    let s = &report.summary;
    println!(
        "{} questions, {} attempted, accuracy {}%",
        s.total_questions, s.attempted, s.accuracy_percent
    );

    if report.topic_feedback.is_empty() {
        println!("{}", report.learning_plan_summary);
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Topic", "Correct", "Wrong", "Questions", "Accuracy"]);

    for (topic, fb) in &report.topic_feedback {
        table.add_row(vec![
            Cell::new(topic),
            Cell::new(format!("{:.2}", fb.stat.correct_count)),
            Cell::new(format!("{:.2}", fb.stat.wrong_count)),
            Cell::new(fb.stat.total_questions),
            Cell::new(format!("{:.1}%", fb.stat.accuracy_percent())),
        ]);
    }

    println!("{table}");

    if !report.learning_plan.is_empty() {
        println!("\nLearning plan:");
        for step in &report.learning_plan {
            println!("  Day {}: {}", step.day, step.skill_category);
        }
    }
}
