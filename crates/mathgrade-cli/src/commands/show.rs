//! The `mathgrade show` command.

use std::path::PathBuf;

use anyhow::Result;

use mathgrade_core::report::SavedReport;

use crate::config::load_config_from;

pub fn execute(report_path: PathBuf, format: String) -> Result<()> {
    let saved = SavedReport::load_json(&report_path)?;
    let report = &saved.report;

    match format.as_str() {
        "markdown" | "md" => {
            println!("# mathgrade report: {}\n", saved.grade);
            print!("{}", report.to_markdown());
        }
        "json" => {
            let config = load_config_from(None)?;
            let json = if config.pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            println!("{json}");
        }
        _ => {
            // text format
            let s = &report.summary;
            println!(
                "Report {} ({}, {})",
                saved.id,
                saved.grade,
                saved.created_at.format("%Y-%m-%d %H:%M UTC")
            );
            println!(
                "Summary: {} questions, {} attempted, {:.2} correct, {:.2} wrong, {}% accuracy, {:.0}s",
                s.total_questions, s.attempted, s.correct, s.wrong, s.accuracy_percent, s.total_time
            );

            if !report.topic_feedback.is_empty() {
                println!("\nTopics:");
                for (topic, fb) in &report.topic_feedback {
                    println!(
                        "  {topic}: {:.2}/{} correct",
                        fb.stat.correct_count, fb.stat.total_questions
                    );
                    println!("    {}", fb.positive_feedback);
                    println!("    {}", fb.improvement_feedback);
                }
            }

            if !report.learning_plan.is_empty() {
                println!("\nLearning plan:");
                for step in &report.learning_plan {
                    println!("  Day {}: {}", step.day, step.skill_category);
                    println!("    With tutor: {}", step.learn_with_tutor);
                    println!("    On your own: {}", step.self_learn);
                }
            }

            println!("\n{}", report.learning_plan_summary);
        }
    }

    Ok(())
}
