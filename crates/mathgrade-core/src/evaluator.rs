//! Per-question evaluation.
//!
//! [`evaluate`] is the boundary between the scorers and the rest of the
//! grader: scorer errors are logged here and turned into a score of 0.

use crate::model::AttemptRecord;
use crate::normalize::{is_empty_container, normalize};
use crate::results::ScoreResult;
use crate::traits::scorer_for;

/// Grade one attempt record.
pub fn evaluate(record: &AttemptRecord) -> ScoreResult {
    let kind = record.question_type();
    let canonical = normalize(&record.answer);
    let submitted = normalize(&record.user_answer);

    let attempted = is_attempted(&submitted, kind.is_structured());

    let score = if attempted {
        let scorer = scorer_for(kind);
        match scorer.score(record, &submitted, &canonical) {
            Ok(score) => score.clamp(0.0, 1.0),
            Err(e) => {
                tracing::debug!(
                    question_id = ?record.question_id,
                    scorer = scorer.name(),
                    submission_fault = e.is_submission_fault(),
                    "scoring failed, awarding 0: {e}"
                );
                0.0
            }
        }
    } else {
        0.0
    };

    ScoreResult {
        attempted,
        is_correct: score == 1.0,
        score,
        correct_answer: canonical,
        user_answer: (!submitted.is_empty()).then_some(submitted),
    }
}

/// A blank submission is never an attempt. For table and tree questions the
/// front end sends `{}` when no cell was filled, which is not an attempt either.
fn is_attempted(submitted: &str, structured: bool) -> bool {
    if submitted.is_empty() {
        return false;
    }
    !(structured && is_empty_container(submitted))
}
