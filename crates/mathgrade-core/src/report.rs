//! Report types with JSON persistence and markdown rendering.
//!
//! [`Report`] is the deterministic output of grading. [`SavedReport`] wraps it
//! with run metadata (id, timestamp) for writing to disk, so two reports for
//! the same input still compare byte-for-byte.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feedback::NO_RESPONSES;
use crate::model::Identifier;
use crate::plan::PlanStep;
use crate::statistics::{Summary, TopicStat};

/// The complete grading report for one learner's batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub summary: Summary,
    /// Topic name to stats and feedback text, in name order.
    pub topic_feedback: BTreeMap<String, TopicFeedback>,
    /// One entry per record, in input order.
    pub per_question_report: Vec<QuestionReport>,
    /// One entry per record, in input order.
    pub time_report: Vec<TimeEntry>,
    /// Human-readable learning plan.
    pub learning_plan_summary: String,
    /// Day-by-day remediation schedule.
    pub learning_plan: Vec<PlanStep>,
}

/// Stats and generated text for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicFeedback {
    #[serde(flatten)]
    pub stat: TopicStat,
    pub positive_feedback: String,
    pub improvement_feedback: String,
}

/// Per-question detail. Missing optional fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReport {
    pub question_id: Option<Identifier>,
    pub question: Option<String>,
    pub image: Option<String>,
    pub topic: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub tree: Option<serde_json::Value>,
    pub rows: Option<Vec<serde_json::Value>>,
    pub headers: Option<serde_json::Value>,
    pub input_keys: Option<serde_json::Value>,
    pub correct_answer: String,
    pub user_answer: Option<String>,
    pub attempted: bool,
    pub is_correct: bool,
    pub score: f64,
    pub time_taken: Option<f64>,
}

/// Time spent on one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub question_id: Option<Identifier>,
    pub question: Option<String>,
    pub time_taken: Option<f64>,
}

impl Report {
    /// The report for a batch with no records.
    pub fn empty() -> Self {
        Self {
            summary: Summary::default(),
            topic_feedback: BTreeMap::new(),
            per_question_report: Vec::new(),
            time_report: Vec::new(),
            learning_plan_summary: NO_RESPONSES.to_string(),
            learning_plan: Vec::new(),
        }
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let s = &self.summary;

        md.push_str(&format!(
            "**Summary:** {} questions, {} attempted, {:.2} correct, {:.2} wrong, {}% accuracy\n\n",
            s.total_questions, s.attempted, s.correct, s.wrong, s.accuracy_percent
        ));

        if !self.topic_feedback.is_empty() {
            md.push_str("### Topics\n\n");
            md.push_str("| Topic | Correct | Wrong | Questions | Feedback |\n");
            md.push_str("|-------|---------|-------|-----------|----------|\n");
            for (topic, fb) in &self.topic_feedback {
                md.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {} | {} {} |\n",
                    topic,
                    fb.stat.correct_count,
                    fb.stat.wrong_count,
                    fb.stat.total_questions,
                    fb.positive_feedback,
                    fb.improvement_feedback
                ));
            }
            md.push('\n');
        }

        if !self.learning_plan.is_empty() {
            md.push_str("### Learning Plan\n\n");
            md.push_str("| Day | Skill | With Tutor | Self Learning |\n");
            md.push_str("|-----|-------|------------|---------------|\n");
            for step in &self.learning_plan {
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    step.day, step.skill_category, step.learn_with_tutor, step.self_learn
                ));
            }
            md.push('\n');
        }

        md.push_str("### Summary Plan\n\n");
        md.push_str(&self.learning_plan_summary);
        md.push('\n');

        md
    }
}

/// A report as written to disk, with run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Grade label the batch was graded for.
    pub grade: String,
    /// Where the attempt batch came from, if known.
    pub source: Option<String>,
    pub report: Report,
}

impl SavedReport {
    pub fn new(report: Report, grade: impl Into<String>, source: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            grade: grade.into(),
            source,
            report,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SavedReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
