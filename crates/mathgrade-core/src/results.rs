//! Per-question grading results.

use serde::{Deserialize, Serialize};

/// The outcome of grading one [`AttemptRecord`](crate::model::AttemptRecord).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Whether the learner submitted anything gradable.
    pub attempted: bool,
    /// `true` only for full credit; partial credit never sets it.
    pub is_correct: bool,
    /// Credit in `[0, 1]`.
    pub score: f64,
    /// Normalized canonical answer.
    pub correct_answer: String,
    /// Normalized submission, `None` when nothing was submitted.
    pub user_answer: Option<String>,
}
