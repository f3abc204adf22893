//! Topic aggregation and summary statistics.
//!
//! Both folds sum credits in a canonical order (sorted by value) so the
//! results are bit-identical for any permutation of the input records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::AttemptRecord;
use crate::results::ScoreResult;

/// Cumulative performance for one topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStat {
    /// Sum of credit earned on attempted questions.
    pub correct_count: f64,
    /// Sum of credit missed on attempted questions.
    pub wrong_count: f64,
    /// Questions in the topic, attempted or not.
    pub total_questions: usize,
}

impl TopicStat {
    /// Attempted questions, as `correct + wrong`.
    pub fn attempted(&self) -> f64 {
        self.correct_count + self.wrong_count
    }

    /// Accuracy over attempted questions in percent; 0 with no attempts.
    pub fn accuracy_percent(&self) -> f64 {
        let attempted = self.attempted();
        if attempted == 0.0 {
            0.0
        } else {
            self.correct_count / attempted * 100.0
        }
    }

    /// Attempted at least once and no credit lost anywhere, partial or otherwise.
    pub fn is_perfect(&self) -> bool {
        let attempted = self.attempted();
        attempted > 0.0 && self.wrong_count == 0.0 && self.correct_count == attempted
    }
}

/// Per-topic accumulator used during the fold.
#[derive(Debug, Default)]
struct TopicTally {
    total_questions: usize,
    credits: Vec<f64>,
}

impl TopicTally {
    fn finish(mut self) -> TopicStat {
        self.credits.sort_by(f64::total_cmp);
        TopicStat {
            correct_count: self.credits.iter().sum(),
            wrong_count: self.credits.iter().map(|c| 1.0 - c).sum(),
            total_questions: self.total_questions,
        }
    }
}

/// Fold per-question results into per-topic stats.
///
/// Every topic seen gets an entry, even when none of its questions were
/// attempted; only attempted questions contribute credit.
pub fn fold_topics<'a, I>(graded: I) -> BTreeMap<String, TopicStat>
where
    I: IntoIterator<Item = (&'a str, &'a ScoreResult)>,
{
    graded
        .into_iter()
        .fold(
            BTreeMap::<String, TopicTally>::new(),
            |mut tallies, (topic, result)| {
                let tally = tallies.entry(topic.to_string()).or_default();
                tally.total_questions += 1;
                if result.attempted {
                    tally.credits.push(result.score);
                }
                tallies
            },
        )
        .into_iter()
        .map(|(topic, tally)| (topic, tally.finish()))
        .collect()
}

/// Overall totals for a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_questions: usize,
    pub attempted: usize,
    /// Sum of credit on attempted questions.
    pub correct: f64,
    /// Sum of missed credit on attempted questions.
    pub wrong: f64,
    /// `round(100 × correct / total_questions)`.
    pub accuracy_percent: u32,
    /// Seconds spent on attempted questions with a numeric time.
    pub total_time: f64,
}

/// Compute the summary over all graded records.
///
/// Accuracy is measured against every question in the batch, not just the
/// attempted ones: skipping a question lowers accuracy.
pub fn compute_summary(graded: &[(&AttemptRecord, ScoreResult)]) -> Summary {
    let total_questions = graded.len();
    let attempted: Vec<&(&AttemptRecord, ScoreResult)> =
        graded.iter().filter(|(_, r)| r.attempted).collect();

    let mut credits: Vec<f64> = attempted.iter().map(|(_, r)| r.score).collect();
    credits.sort_by(f64::total_cmp);
    let correct: f64 = credits.iter().sum();
    let wrong: f64 = credits.iter().map(|c| 1.0 - c).sum();

    let mut times: Vec<f64> = attempted
        .iter()
        .filter_map(|(record, _)| record.time_taken)
        .collect();
    times.sort_by(f64::total_cmp);

    let accuracy_percent = if total_questions == 0 {
        0
    } else {
        (correct / total_questions as f64 * 100.0).round() as u32
    };

    Summary {
        total_questions,
        attempted: attempted.len(),
        correct,
        wrong,
        accuracy_percent,
        total_time: times.iter().sum(),
    }
}
