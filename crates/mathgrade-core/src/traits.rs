//! The scorer seam.
//!
//! Each question archetype has one [`Scorer`]. The evaluator looks up the
//! scorer for a record with [`scorer_for`] and never knows which algorithm it
//! is talking to.

use crate::error::ScoreError;
use crate::factor_tree::FactorTreeScorer;
use crate::model::{AttemptRecord, QuestionType};
use crate::scalar::ScalarScorer;
use crate::table::TableScorer;

/// A type-specific grading algorithm.
pub trait Scorer: Send + Sync {
    /// Short name used in log output (e.g. "table").
    fn name(&self) -> &'static str;

    /// Grade one attempted record.
    ///
    /// `submitted` and `canonical` are the normalized answer strings; the
    /// record is passed along for auxiliary payloads (table rows, trees).
    /// Returns a credit in `[0, 1]`.
    fn score(
        &self,
        record: &AttemptRecord,
        submitted: &str,
        canonical: &str,
    ) -> Result<f64, ScoreError>;
}

static SCALAR: ScalarScorer = ScalarScorer;
static TABLE: TableScorer = TableScorer;
static FACTOR_TREE: FactorTreeScorer = FactorTreeScorer;

/// The scorer responsible for a question archetype.
pub fn scorer_for(kind: QuestionType) -> &'static dyn Scorer {
    match kind {
        QuestionType::Scalar => &SCALAR,
        QuestionType::TableInput => &TABLE,
        QuestionType::FactorTree => &FACTOR_TREE,
    }
}
