//! JSON attempt batch parser.
//!
//! Loads attempt batches from JSON files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::model::{AttemptRecord, QuestionType, TableVariant, KNOWN_TYPE_TAGS};
use crate::normalize::normalize;

/// A learner's batch of attempt records, in submission order.
#[derive(Debug, Clone, Default)]
pub struct AttemptBatch {
    /// Grade label carried by the batch, if any.
    pub grade: Option<String>,
    pub responses: Vec<AttemptRecord>,
    /// Entries that could not be read as attempt records.
    pub skipped: usize,
}

impl AttemptBatch {
    /// Build a batch from untyped JSON.
    ///
    /// Accepts a bare array of records or an object with `grade` and
    /// `responses`. Anything else is an empty batch.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::from_items(None, items),
            Value::Object(map) => {
                let grade = map.get("grade").and_then(Value::as_str).map(str::to_string);
                match map.get("responses") {
                    Some(Value::Array(items)) => Self::from_items(grade, items),
                    _ => Self {
                        grade,
                        ..Default::default()
                    },
                }
            }
            _ => Self::default(),
        }
    }

    fn from_items(grade: Option<String>, items: &[Value]) -> Self {
        let mut responses = Vec::with_capacity(items.len());
        let mut skipped = 0;
        for (index, item) in items.iter().enumerate() {
            match serde_json::from_value::<AttemptRecord>(item.clone()) {
                Ok(record) => responses.push(record),
                Err(e) => {
                    tracing::warn!(index, "skipping unreadable attempt record: {e}");
                    skipped += 1;
                }
            }
        }
        Self {
            grade,
            responses,
            skipped,
        }
    }
}

/// Parse a single JSON file into an `AttemptBatch`.
pub fn parse_attempt_batch(path: &Path) -> Result<AttemptBatch> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read attempt batch file: {}", path.display()))?;

    parse_attempt_batch_str(&content, path)
}

/// Parse a JSON string into an `AttemptBatch`.
pub fn parse_attempt_batch_str(content: &str, source_path: &Path) -> Result<AttemptBatch> {
    let value: Value = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    if !(value.is_array() || value.get("responses").is_some_and(Value::is_array)) {
        anyhow::bail!(
            "{}: expected an array of attempts or an object with a \"responses\" array",
            source_path.display()
        );
    }

    Ok(AttemptBatch::from_value(&value))
}

/// Recursively load all `.json` attempt batches from a directory.
pub fn load_batch_directory(dir: &Path) -> Result<Vec<AttemptBatch>> {
    let mut batches = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            batches.extend(load_batch_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match parse_attempt_batch(&path) {
                Ok(batch) => batches.push(batch),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(batches)
}

/// A warning from batch validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID, when the warning is about one record.
    pub question_id: Option<String>,
    pub message: String,
}

impl ValidationWarning {
    fn for_record(record: &AttemptRecord, index: usize, message: impl Into<String>) -> Self {
        let question_id = record
            .question_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("#{index}"));
        Self {
            question_id: Some(question_id),
            message: message.into(),
        }
    }
}

/// Validate a batch for common data problems. None of these stop grading.
pub fn validate_batch(batch: &AttemptBatch) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if batch.skipped > 0 {
        warnings.push(ValidationWarning {
            question_id: None,
            message: format!("{} record(s) could not be read and will be skipped", batch.skipped),
        });
    }

    let mut seen_ids = HashSet::new();
    for (index, record) in batch.responses.iter().enumerate() {
        if let Some(id) = &record.question_id {
            if !seen_ids.insert(id) {
                warnings.push(ValidationWarning::for_record(
                    record,
                    index,
                    format!("duplicate question ID: {id}"),
                ));
            }
        }

        if record.topic.as_deref().is_none_or(|t| t.trim().is_empty()) {
            warnings.push(ValidationWarning::for_record(
                record,
                index,
                "no topic, will be grouped under \"General\"",
            ));
        }

        if let Some(tag) = record.kind.as_deref() {
            if !KNOWN_TYPE_TAGS.contains(&tag) {
                warnings.push(ValidationWarning::for_record(
                    record,
                    index,
                    format!("unknown question type {tag:?}, will be graded as a scalar answer"),
                ));
            }
        }

        if record.question_type() == QuestionType::TableInput {
            if let Some(Err(e)) = record.variant.as_deref().map(str::parse::<TableVariant>) {
                warnings.push(ValidationWarning::for_record(record, index, e));
            }
        }

        let canonical = normalize(&record.answer);
        if canonical.is_empty() {
            warnings.push(ValidationWarning::for_record(
                record,
                index,
                "canonical answer is empty",
            ));
            continue;
        }

        match record.question_type() {
            QuestionType::TableInput => {
                if serde_json::from_str::<Value>(&canonical).is_err() {
                    warnings.push(ValidationWarning::for_record(
                        record,
                        index,
                        "table answer is not JSON, rows will be compared as plain text",
                    ));
                }
            }
            QuestionType::FactorTree => {
                let embedded = serde_json::from_str::<Value>(&canonical)
                    .is_ok_and(|v| v.get("val").is_some());
                if record.tree.is_none() && !embedded {
                    warnings.push(ValidationWarning::for_record(
                        record,
                        index,
                        "factor tree question has no tree, only answer keys will be compared",
                    ));
                }
            }
            QuestionType::Scalar => {}
        }
    }

    warnings
}
