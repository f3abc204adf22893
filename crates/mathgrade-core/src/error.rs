//! Scoring error types.
//!
//! These errors describe why a submission could not be graded. They never
//! leave the evaluator: every variant degrades to a score of 0 there, but
//! keeping them typed lets the evaluator log the cause and lets tests assert
//! on it without string matching.

use thiserror::Error;

/// Errors raised by a [`Scorer`](crate::traits::Scorer) while grading one record.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The canonical or submitted answer is not valid JSON.
    #[error("malformed answer JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// A factor-tree question carries no tree, neither in its auxiliary
    /// payload nor in its canonical answer.
    #[error("factor tree is missing")]
    MissingTree,

    /// A tree node has no integer value.
    #[error("factor tree node {node} has no integer value")]
    InvalidNodeValue { node: String },

    /// The learner left an input node blank.
    #[error("no submitted value for input node {node}")]
    MissingInput { node: String },

    /// Multiplying the children of a node overflowed `i64`.
    #[error("product of children overflowed at node {node}")]
    ProductOverflow { node: String },
}

impl ScoreError {
    /// Returns `true` if the error was caused by the learner's submission
    /// rather than by the question definition.
    pub fn is_submission_fault(&self) -> bool {
        matches!(
            self,
            ScoreError::MissingInput { .. } | ScoreError::ProductOverflow { .. }
        )
    }
}
