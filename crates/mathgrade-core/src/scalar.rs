//! Scalar and short-text answers.

use crate::error::ScoreError;
use crate::model::AttemptRecord;
use crate::normalize::{approx_eq, parse_number, strip_whitespace};
use crate::traits::Scorer;

/// Binary scorer for single values: numeric within tolerance, otherwise
/// whitespace-insensitive text equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarScorer;

impl Scorer for ScalarScorer {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn score(
        &self,
        _record: &AttemptRecord,
        submitted: &str,
        canonical: &str,
    ) -> Result<f64, ScoreError> {
        Ok(if scalar_matches(submitted, canonical) {
            1.0
        } else {
            0.0
        })
    }
}

/// Compare two normalized scalar answers.
pub fn scalar_matches(submitted: &str, canonical: &str) -> bool {
    if submitted.is_empty() {
        return false;
    }
    match (parse_number(submitted), parse_number(canonical)) {
        (Some(given), Some(expected)) => approx_eq(given, expected),
        _ => strip_whitespace(submitted) == strip_whitespace(canonical),
    }
}
